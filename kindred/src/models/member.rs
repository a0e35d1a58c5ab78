//! Member model representing one person in the family record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable member identifier, assigned by the record store at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl MemberId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MemberId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for MemberId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// Recorded sex of a member
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

impl Sex {
    /// Wire name, or `None` when nothing is recorded.
    pub fn as_known(self) -> Option<Self> {
        match self {
            Sex::Unknown => None,
            known => Some(known),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
            Sex::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            "other" => Ok(Sex::Other),
            "unknown" | "" => Ok(Sex::Unknown),
            other => Err(format!("Invalid sex '{}'", other)),
        }
    }
}

/// A person in the genealogical store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    /// Identifier assigned at creation; immutable afterwards
    pub id: MemberId,

    pub firstname: String,

    pub lastname: String,

    /// Calendar date of birth, if known
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    /// Calendar date of death, if any
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,

    #[serde(default, deserialize_with = "deserialize_sex")]
    pub sex: Sex,
}

impl Member {
    /// Materialise a member from a creation payload and a store-assigned id
    pub fn from_new(id: MemberId, new: NewMember) -> Self {
        Self {
            id,
            firstname: new.firstname,
            lastname: new.lastname,
            date_of_birth: new.date_of_birth,
            date_of_death: new.date_of_death,
            sex: new.sex,
        }
    }

    /// `"<first> <last>"`
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Apply a partial update. The id is never touched.
    pub fn apply(&mut self, update: MemberUpdate) {
        if let Some(firstname) = update.firstname {
            self.firstname = firstname;
        }
        if let Some(lastname) = update.lastname {
            self.lastname = lastname;
        }
        if let Some(date_of_birth) = update.date_of_birth {
            self.date_of_birth = date_of_birth;
        }
        if let Some(date_of_death) = update.date_of_death {
            self.date_of_death = date_of_death;
        }
        if let Some(sex) = update.sex {
            self.sex = sex;
        }
    }
}

/// Payload for creating a member; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewMember {
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_sex")]
    pub sex: Sex,
}

impl NewMember {
    /// Reject payloads that could never render a label.
    pub fn validate(&self) -> Result<(), String> {
        if self.firstname.trim().is_empty() {
            return Err("firstname cannot be empty".to_string());
        }
        if self.lastname.trim().is_empty() {
            return Err("lastname cannot be empty".to_string());
        }
        if let (Some(born), Some(died)) = (self.date_of_birth, self.date_of_death)
            && died < born
        {
            return Err(format!(
                "date_of_death {} precedes date_of_birth {}",
                died, born
            ));
        }
        Ok(())
    }
}

impl From<Member> for NewMember {
    fn from(member: Member) -> Self {
        Self {
            firstname: member.firstname,
            lastname: member.lastname,
            date_of_birth: member.date_of_birth,
            date_of_death: member.date_of_death,
            sex: member.sex,
        }
    }
}

/// Partial update of a member's attributes.
///
/// The outer `Option` on the dates means "leave unchanged"; `Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberUpdate {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub date_of_death: Option<Option<NaiveDate>>,
    pub sex: Option<Sex>,
}

impl MemberUpdate {
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none()
            && self.lastname.is_none()
            && self.date_of_birth.is_none()
            && self.date_of_death.is_none()
            && self.sex.is_none()
    }
}

/// Builder for creating new members
#[derive(Debug, Clone, Default)]
pub struct MemberBuilder {
    new: NewMember,
}

impl MemberBuilder {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            new: NewMember {
                firstname: firstname.into(),
                lastname: lastname.into(),
                ..Default::default()
            },
        }
    }

    /// Set the date of birth from a `YYYY-MM-DD` string; invalid dates are ignored.
    pub fn born(mut self, date: &str) -> Self {
        self.new.date_of_birth = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok();
        self
    }

    pub fn born_on(mut self, date: NaiveDate) -> Self {
        self.new.date_of_birth = Some(date);
        self
    }

    pub fn died(mut self, date: &str) -> Self {
        self.new.date_of_death = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok();
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.new.sex = sex;
        self
    }

    pub fn build(self) -> NewMember {
        self.new
    }

    /// Build a full member with a known id (tests and fixtures)
    pub fn with_id(self, id: i64) -> Member {
        Member::from_new(MemberId(id), self.new)
    }
}

/// `null` on the wire means unknown.
fn deserialize_sex<'de, D>(deserializer: D) -> Result<Sex, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Sex> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_deserializes_null_sex_as_unknown() {
        let member: Member = serde_json::from_str(
            r#"{"id": 4, "firstname": "James", "lastname": "Javier", "date_of_birth": "1944-05-30", "sex": null}"#,
        )
        .unwrap();

        assert_eq!(member.id, MemberId(4));
        assert_eq!(member.sex, Sex::Unknown);
        assert_eq!(member.date_of_birth, NaiveDate::from_ymd_opt(1944, 5, 30));
        assert_eq!(member.date_of_death, None);
    }

    #[test]
    fn test_apply_update_keeps_id() {
        let mut member = MemberBuilder::new("Kat", "Javier")
            .born("1998-12-15")
            .sex(Sex::Female)
            .with_id(11);

        member.apply(MemberUpdate {
            lastname: Some("Moreno".to_string()),
            date_of_birth: Some(None),
            ..Default::default()
        });

        assert_eq!(member.id, MemberId(11));
        assert_eq!(member.display_name(), "Kat Moreno");
        assert_eq!(member.date_of_birth, None);
        assert_eq!(member.sex, Sex::Female);
    }

    #[test]
    fn test_new_member_validation() {
        assert!(MemberBuilder::new("Mom", "Javier").build().validate().is_ok());
        assert!(MemberBuilder::new("  ", "Javier").build().validate().is_err());

        let impossible = MemberBuilder::new("Robert", "Chen")
            .born("1943-07-22")
            .died("1940-01-01")
            .build();
        assert!(impossible.validate().is_err());
    }

    #[test]
    fn test_sex_parsing() {
        assert_eq!("Female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("".parse::<Sex>().unwrap(), Sex::Unknown);
        assert!("robot".parse::<Sex>().is_err());
        assert_eq!(Sex::Unknown.as_known(), None);
        assert_eq!(Sex::Other.as_known(), Some(Sex::Other));
    }
}
