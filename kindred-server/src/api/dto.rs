//! Data Transfer Objects for the API

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use kindred::models::{
    Member, MemberId, MemberUpdate, NewMember, Partnership, Relationship, Sex,
};

/// Family member DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberDto {
    /// Identifier assigned by the record store
    pub id: i64,

    pub firstname: String,

    pub lastname: String,

    /// Date of birth, `YYYY-MM-DD`
    pub date_of_birth: Option<NaiveDate>,

    /// Date of death, `YYYY-MM-DD`
    pub date_of_death: Option<NaiveDate>,

    /// `male`, `female`, `other` or `unknown`
    pub sex: String,

    /// HATEOAS links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<HateoasLinks>,
}

impl From<Member> for MemberDto {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.get(),
            links: Some(HateoasLinks::for_member(member.id)),
            firstname: member.firstname,
            lastname: member.lastname,
            date_of_birth: member.date_of_birth,
            date_of_death: member.date_of_death,
            sex: member.sex.to_string(),
        }
    }
}

/// Request to create a new family member
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "firstname": "Ada",
    "lastname": "Lovelace",
    "date_of_birth": "1815-12-10",
    "sex": "female"
}))]
pub struct CreateMemberRequest {
    pub firstname: String,

    pub lastname: String,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,

    /// Defaults to `unknown`
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub sex: Option<Sex>,
}

impl From<CreateMemberRequest> for NewMember {
    fn from(request: CreateMemberRequest) -> Self {
        Self {
            firstname: request.firstname,
            lastname: request.lastname,
            date_of_birth: request.date_of_birth,
            date_of_death: request.date_of_death,
            sex: request.sex.unwrap_or_default(),
        }
    }
}

/// Request to update an existing family member
///
/// Omitted fields are left untouched. An explicit `null` date clears it.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMemberRequest {
    pub firstname: Option<String>,

    pub lastname: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_death: Option<Option<NaiveDate>>,

    #[schema(value_type = Option<String>)]
    pub sex: Option<Sex>,
}

impl From<UpdateMemberRequest> for MemberUpdate {
    fn from(request: UpdateMemberRequest) -> Self {
        Self {
            firstname: request.firstname,
            lastname: request.lastname,
            date_of_birth: request.date_of_birth,
            date_of_death: request.date_of_death,
            sex: request.sex,
        }
    }
}

/// Present-but-null becomes `Some(None)`; absent stays `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parent→child relationship DTO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RelationshipDto {
    pub parent_id: i64,
    pub child_id: i64,
}

impl From<Relationship> for RelationshipDto {
    fn from(relationship: Relationship) -> Self {
        Self {
            parent_id: relationship.parent_id.get(),
            child_id: relationship.child_id.get(),
        }
    }
}

/// Request to create (or validate) a parent→child relationship
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "parent_id": 1, "child_id": 5 }))]
pub struct CreateRelationshipRequest {
    pub parent_id: i64,
    pub child_id: i64,
}

impl CreateRelationshipRequest {
    pub fn ids(&self) -> (MemberId, MemberId) {
        (MemberId(self.parent_id), MemberId(self.child_id))
    }
}

/// Request to point an existing relationship at a different child
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ChangeChildRequest {
    pub new_child_id: i64,
}

/// Outcome of a validation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationResponse {
    pub valid: bool,

    /// Reason code when `valid` is false, e.g. `cycle`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationResponse {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn rejected(reason: &str) -> Self {
        Self {
            valid: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Partnership DTO; `partner1_id` is always the smaller id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PartnershipDto {
    pub partner1_id: i64,
    pub partner2_id: i64,
}

impl From<Partnership> for PartnershipDto {
    fn from(partnership: Partnership) -> Self {
        Self {
            partner1_id: partnership.partner1_id.get(),
            partner2_id: partnership.partner2_id.get(),
        }
    }
}

/// Request to record a partnership
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct CreatePartnershipRequest {
    pub partner1_id: i64,
    pub partner2_id: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: serde_json::Value,
}

/// HATEOAS links
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HateoasLinks {
    /// Link to self
    #[serde(rename = "self")]
    pub self_link: String,

    /// Related links
    #[serde(flatten)]
    pub related: BTreeMap<String, String>,
}

impl HateoasLinks {
    /// Create HATEOAS links for a family member
    pub fn for_member(id: MemberId) -> Self {
        let related = ["children", "ancestors", "descendants"]
            .into_iter()
            .map(|rel| (rel.to_string(), format!("/api/familymembers/{}/{}", id, rel)))
            .collect();

        Self {
            self_link: format!("/api/familymembers/{}", id),
            related,
        }
    }
}
