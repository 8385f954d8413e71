use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::routes::{chat, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "banter-server",
        description = "Chat storage and bot replies over HTTP",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by the `/chat` paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(chat::ChatApi::openapi());
    // Components only exist once the route docs are merged in.
    BearerAuth.modify(&mut root);
    root
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn documents_chat_routes_and_bearer_scheme() {
        let doc = get_docs();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["paths"]["/chat/"].is_object());
        assert!(json["paths"]["/chat/{id}/response/"]["get"].is_object());
        assert!(json["components"]["schemas"]["Chat"].is_object());
        assert!(json["components"]["schemas"]["HealthResponse"].is_object());
        assert_eq!(
            json["components"]["securitySchemes"]["bearer"]["scheme"],
            "bearer"
        );
    }
}
