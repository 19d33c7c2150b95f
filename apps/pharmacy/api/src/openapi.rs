use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `bearer_auth` scheme referenced by protected handlers.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Pharmacy API",
        version = "0.1.0",
        description = "Online pharmacy: accounts, catalog, cart, orders, banners and customer/specialist chat"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/users", api = domain_users::handlers::ApiDoc),
        (path = "/banners", api = domain_banners::handlers::ApiDoc),
        (path = "/cart", api = domain_cart::handlers::ApiDoc),
        (path = "/orders", api = domain_orders::handlers::ApiDoc)
    ),
    modifiers(&SecurityAddon)
)]
struct BaseDoc;

/// Full document: nested domains plus the catalog and chat paths, which
/// already sit at the API root.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = BaseDoc::openapi();
        doc.merge(domain_catalog::handlers::ApiDoc::openapi());
        doc.merge(domain_chat::handlers::ApiDoc::openapi());
        doc
    }
}
