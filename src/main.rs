use std::env;
use std::sync::Arc;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::models::config::CommonServerConfig;

use pushkind_storefront::config::CheckoutSettings;
use pushkind_storefront::db::establish_connection_pool;
use pushkind_storefront::notifier::{LogNotifier, Notifier};
use pushkind_storefront::repository::DieselRepository;
use pushkind_storefront::routes::admin::api_v1_resend_confirmations;
use pushkind_storefront::routes::cart::{
    api_v1_cart, api_v1_cart_add_item, api_v1_cart_clear, api_v1_cart_remove_item,
};
use pushkind_storefront::routes::checkout::{api_v1_checkout, api_v1_checkout_quote};
use pushkind_storefront::routes::coupons::api_v1_coupon_check;
use pushkind_storefront::routes::orders::{api_v1_order_detail, api_v1_orders};
use pushkind_storefront::routes::shipping::api_v1_shipping;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let auth_service_url = match env::var("AUTH_SERVICE_URL") {
        Ok(auth_service_url) => auth_service_url,
        Err(_) => {
            log::error!("AUTH_SERVICE_URL environment variable not set");
            std::process::exit(1);
        }
    };

    let common_config = CommonServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url,
    };

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let settings = CheckoutSettings::from_env();
    log::info!(
        "Checkout settings: tax rate {}, idempotency window {:?}, {} follow-up attempts",
        settings.tax_rate,
        settings.idempotency_window,
        settings.follow_up.max_attempts
    );

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(
                web::scope("/api")
                    .service(api_v1_checkout_quote)
                    .service(api_v1_checkout)
                    .service(api_v1_shipping)
                    .service(api_v1_coupon_check)
                    .service(api_v1_cart)
                    .service(api_v1_cart_add_item)
                    .service(api_v1_cart_remove_item)
                    .service(api_v1_cart_clear)
                    .service(api_v1_orders)
                    .service(api_v1_order_detail)
                    .service(api_v1_resend_confirmations),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(settings.clone()))
            .app_data(web::Data::from(Arc::clone(&notifier)))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
