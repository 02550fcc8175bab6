#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::openapi::{PathItemType, RefOr, Schema};
    use utoipa::OpenApi;

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components are generated");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            _ => panic!("{name} should be an object schema"),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        let components = openapi.components.as_ref().unwrap();
        for name in ["ErrorResponse", "HealthResponse", "TicketResponse", "PronosticResponse"] {
            assert!(components.schemas.contains_key(name), "{name} is missing");
        }

        assert!(serde_json::to_string(&openapi).is_ok());
        assert_eq!(openapi.info.title, "Pronostics API");
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.iter().any(|p| p == field), "missing {field}");
        }
    }

    #[test]
    fn test_ticket_response_exposes_derived_fields() {
        let properties = object_properties("TicketResponse");
        for field in ["odd", "status", "pronostics", "stake", "pack"] {
            assert!(properties.iter().any(|p| p == field), "missing {field}");
        }
    }

    #[test]
    fn test_openapi_paths() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        let expected = [
            ("/health", PathItemType::Get),
            ("/api/v1/users", PathItemType::Post),
            ("/api/v1/users/me", PathItemType::Delete),
            ("/api/v1/login", PathItemType::Post),
            ("/api/v1/logout", PathItemType::Post),
            ("/api/v1/subscription", PathItemType::Post),
            ("/api/v1/users/subscription/{subscription_id}", PathItemType::Delete),
            ("/api/v1/tickets", PathItemType::Get),
            ("/api/v1/tickets/{ticket_id}", PathItemType::Put),
            ("/api/v1/pronostics/{pronostic_id}", PathItemType::Put),
            ("/api/v1/sports/{sport_id}", PathItemType::Delete),
            ("/api/v1/competitions", PathItemType::Post),
            ("/api/v1/contact", PathItemType::Post),
        ];
        for (path, method) in expected {
            let item = paths
                .get(path)
                .unwrap_or_else(|| panic!("{path} is not documented"));
            assert!(item.operations.contains_key(&method), "{path} lacks the expected method");
        }
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("bearer"));

        let openapi_json = serde_json::to_string(&openapi).unwrap();
        assert!(openapi_json.contains("\"bearer\""));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
    }
}
