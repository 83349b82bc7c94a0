use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error,
};

use crate::{middleware::ErrorResponder, routes, services::UserStore, utils::error::AppError};

/// Same default as body-parser's JSON limit
const JSON_LIMIT: usize = 100 * 1024;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, req| {
            log::warn!("⚠️ Rejected body on {}: {}", req.path(), err);
            AppError::from(err).into()
        })
}

/// Builds the request pipeline: JSON body parsing, the route table, then the
/// error layer wrapping everything. Request logging sits outermost.
pub fn build_app(
    store: web::Data<dyn UserStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(store)
        .app_data(json_config())
        .configure(routes::configure)
        .wrap(ErrorResponder)
        .wrap(Logger::default())
}
