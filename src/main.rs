use actix_files::Files;
use actix_web::{App, HttpServer, web};

use goodmarket::db::establish_connection_pool;
use goodmarket::models::config::ServerConfig;
use goodmarket::repository::DieselRepository;
use goodmarket::routes::products::{
    create_product, delete_product, list_all_products, list_by_category, product_detail,
    product_for_edit, search_products, update_product,
};
use goodmarket::storage::LocalImageStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let settings = match config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::default())
        .build()
        .and_then(|settings| settings.try_deserialize::<ServerConfig>())
    {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return Err(std::io::Error::other(e));
        }
    };

    let pool = match establish_connection_pool(&settings.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database pool: {e}");
            return Err(std::io::Error::other(e));
        }
    };

    let repo = DieselRepository::new(pool);
    let store = LocalImageStore::new(settings.media_root.as_str(), settings.media_base_url.as_str());
    let bind = (settings.bind_address.clone(), settings.port);
    let media_root = settings.media_root.clone();

    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(settings.clone()))
            .service(Files::new("/media", media_root.clone()))
            .service(
                web::scope("/api/products")
                    .service(search_products)
                    .service(list_by_category)
                    .service(create_product)
                    .service(list_all_products)
                    .service(product_for_edit)
                    .service(update_product)
                    .service(delete_product)
                    // registered last so literal paths win over `/{product_id}`
                    .service(product_detail),
            )
    })
    .bind(bind)?
    .run()
    .await
}
