//! Unit tests for DTOs and OpenAPI schema generation

#[cfg(test)]
mod tests {
    use crate::api::dto::*;
    use kindred::models::{MemberBuilder, MemberUpdate, NewMember, Partnership, Sex};
    use serde_json::json;
    use utoipa::OpenApi;

    #[test]
    fn test_member_dto_renders_dates_and_sex() {
        let member = MemberBuilder::new("Ada", "Lovelace")
            .born("1815-12-10")
            .died("1852-11-27")
            .sex(Sex::Female)
            .with_id(3);

        let value = serde_json::to_value(MemberDto::from(member)).unwrap();

        assert_eq!(value["id"], 3);
        assert_eq!(value["date_of_birth"], "1815-12-10");
        assert_eq!(value["date_of_death"], "1852-11-27");
        assert_eq!(value["sex"], "female");
        assert_eq!(value["links"]["self"], "/api/familymembers/3");
        assert_eq!(value["links"]["children"], "/api/familymembers/3/children");
    }

    #[test]
    fn test_create_request_defaults_sex_to_unknown() {
        let request: CreateMemberRequest =
            serde_json::from_value(json!({ "firstname": "A", "lastname": "B" })).unwrap();
        let new = NewMember::from(request);

        assert_eq!(new.sex, Sex::Unknown);
        assert!(new.date_of_birth.is_none());
    }

    #[test]
    fn test_create_request_rejects_bad_date() {
        let result: Result<CreateMemberRequest, _> = serde_json::from_value(json!({
            "firstname": "A",
            "lastname": "B",
            "date_of_birth": "10/12/1815"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let request: UpdateMemberRequest =
            serde_json::from_value(json!({ "date_of_birth": null })).unwrap();
        let update = MemberUpdate::from(request);
        assert_eq!(update.date_of_birth, Some(None));
        assert_eq!(update.date_of_death, None);

        let request: UpdateMemberRequest =
            serde_json::from_value(json!({ "date_of_death": "2001-02-03" })).unwrap();
        let update = MemberUpdate::from(request);
        assert_eq!(update.date_of_birth, None);
        assert_eq!(
            update.date_of_death,
            Some(Some(chrono::NaiveDate::from_ymd_opt(2001, 2, 3).unwrap()))
        );

        let request: UpdateMemberRequest = serde_json::from_value(json!({})).unwrap();
        assert!(MemberUpdate::from(request).is_empty());
    }

    #[test]
    fn test_partnership_dto_is_normalised() {
        let dto = PartnershipDto::from(Partnership::new(9, 4));
        assert_eq!(dto.partner1_id, 4);
        assert_eq!(dto.partner2_id, 9);
    }

    #[test]
    fn test_validation_response_omits_reason_when_valid() {
        assert_eq!(
            serde_json::to_value(ValidationResponse::ok()).unwrap(),
            json!({ "valid": true })
        );
        assert_eq!(
            serde_json::to_value(ValidationResponse::rejected("cycle")).unwrap(),
            json!({ "valid": false, "reason": "cycle" })
        );
    }

    #[test]
    fn test_openapi_document_lists_engine_operations() {
        let doc = crate::api::ApiDoc::openapi();
        let value = serde_json::to_value(&doc).unwrap();
        let paths = value["paths"].as_object().unwrap();

        for path in [
            "/api/graph",
            "/api/relationships/validate",
            "/api/relationships/{parent_id}/{child_id}/removal",
            "/api/familymembers/{id}/children",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(value["components"]["schemas"]["MemberDto"].is_object());
    }
}
