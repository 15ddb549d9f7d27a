//! Project aggregate created when a proposal is accepted.

use super::{CustomerId, PracticeDomainError, ProjectId, ProjectTemplate, ProjectTemplateId};
use crate::tenant::MemberId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a member on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectRole {
    /// Accountable owner of the project.
    Lead,
    /// Contributor.
    Member,
}

/// A member assigned to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMember {
    /// Assigned member.
    pub member_id: MemberId,
    /// Project role.
    pub role: ProjectRole,
}

/// Parameter object for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Project name.
    pub name: String,
    /// Customer the project is delivered for.
    pub customer_id: CustomerId,
    /// Member creating the project; becomes its lead.
    pub created_by: MemberId,
    /// Proposal the project originates from, if any.
    pub proposal_id: Option<Uuid>,
}

/// Project aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    customer_id: CustomerId,
    proposal_id: Option<Uuid>,
    template_id: Option<ProjectTemplateId>,
    description: Option<String>,
    task_names: Vec<String>,
    members: Vec<ProjectMember>,
    created_by: MemberId,
    created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a bare project; the creator is assigned as lead.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::EmptyField`] when the name is blank.
    pub fn new(params: NewProject, clock: &impl Clock) -> Result<Self, PracticeDomainError> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(PracticeDomainError::EmptyField("project name"));
        }
        Ok(Self {
            id: ProjectId::new(),
            name: name.to_owned(),
            customer_id: params.customer_id,
            proposal_id: params.proposal_id,
            template_id: None,
            description: None,
            task_names: Vec::new(),
            members: vec![ProjectMember {
                member_id: params.created_by,
                role: ProjectRole::Lead,
            }],
            created_by: params.created_by,
            created_at: clock.utc(),
        })
    }

    /// Creates a project seeded from a template.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::EmptyField`] when the name is blank.
    pub fn from_template(
        template: &ProjectTemplate,
        params: NewProject,
        clock: &impl Clock,
    ) -> Result<Self, PracticeDomainError> {
        let mut project = Self::new(params, clock)?;
        project.template_id = Some(template.id());
        project.description = template.description().map(str::to_owned);
        project.task_names = template.task_names().to_vec();
        Ok(project)
    }

    /// Assigns a member to the project.
    ///
    /// Returns `false` when the member is already assigned.
    pub fn assign_member(&mut self, member_id: MemberId) -> bool {
        if self.members.iter().any(|member| member.member_id == member_id) {
            return false;
        }
        self.members.push(ProjectMember {
            member_id,
            role: ProjectRole::Member,
        });
        true
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the customer.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the originating proposal identifier, if any.
    #[must_use]
    pub const fn proposal_id(&self) -> Option<Uuid> {
        self.proposal_id
    }

    /// Returns the template the project was created from, if any.
    #[must_use]
    pub const fn template_id(&self) -> Option<ProjectTemplateId> {
        self.template_id
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the seeded task names.
    #[must_use]
    pub fn task_names(&self) -> &[String] {
        &self.task_names
    }

    /// Returns the assigned members, lead first.
    #[must_use]
    pub fn members(&self) -> &[ProjectMember] {
        &self.members
    }

    /// Returns the creating member.
    #[must_use]
    pub const fn created_by(&self) -> MemberId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::DefaultClock;

    fn params(created_by: MemberId) -> NewProject {
        NewProject {
            name: "Annual audit".to_owned(),
            customer_id: CustomerId::new(),
            created_by,
            proposal_id: None,
        }
    }

    #[test]
    fn creator_becomes_lead_and_is_not_reassigned() {
        let lead = MemberId::new();
        let mut project = Project::new(params(lead), &DefaultClock).expect("valid project");

        assert!(!project.assign_member(lead));
        assert!(project.assign_member(MemberId::new()));
        assert_eq!(project.members().len(), 2);
        assert_eq!(
            project.members().first().map(|member| member.role),
            Some(ProjectRole::Lead)
        );
    }

    #[test]
    fn template_seeds_description_and_tasks() {
        let template = ProjectTemplate::new("Audit", "{customer} audit")
            .expect("valid template")
            .with_description("Statutory audit")
            .with_task_names(vec!["Planning".to_owned(), "Fieldwork".to_owned()]);

        let project = Project::from_template(&template, params(MemberId::new()), &DefaultClock)
            .expect("valid project");

        assert_eq!(project.template_id(), Some(template.id()));
        assert_eq!(project.description(), Some("Statutory audit"));
        assert_eq!(project.task_names().len(), 2);
    }
}
