use chrono::Utc;
use diesel::prelude::*;
use goodmarket::db::DbPool;
use goodmarket::domain::product::{NewProduct, ProductUpdate};
use goodmarket::domain::types::{
    ImageUrl, ProductCategory, ProductDescription, ProductId, ProductStatus, ProductTitle,
    SellPrice, UserId,
};
use goodmarket::repository::{DieselRepository, ProductListQuery, ProductReader, ProductWriter};
use goodmarket::schema::{product_images, users};

mod common;

fn seed_user(pool: &DbPool, name: &str, email: &str) -> UserId {
    let mut conn = pool.get().expect("should acquire DB connection");

    diesel::insert_into(users::table)
        .values((users::name.eq(name), users::email.eq(email)))
        .execute(&mut conn)
        .expect("should create user");

    let id: i32 = users::table
        .filter(users::email.eq(email))
        .select(users::id)
        .first(&mut conn)
        .expect("inserted user id should be readable");

    UserId::new(id).expect("valid user id")
}

fn new_product(
    user_id: UserId,
    title: &str,
    category: ProductCategory,
    sell_price: i32,
    images: &[&str],
) -> NewProduct {
    let now = Utc::now().naive_utc();
    NewProduct {
        user_id,
        category,
        title: ProductTitle::new(title).expect("valid title"),
        description: ProductDescription::new(format!("{title} 팝니다.")).expect("valid description"),
        sell_price: SellPrice::new(sell_price).expect("valid price"),
        status: ProductStatus::Sell,
        created_at: now,
        updated_at: now,
        images: images
            .iter()
            .map(|url| ImageUrl::new(*url).expect("valid image url"))
            .collect(),
    }
}

#[test]
fn create_and_fetch_product_with_images() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let user_id = seed_user(&test_db.pool(), "코코", "coco@example.com");

    let created = repo
        .create_product(&new_product(
            user_id,
            "아이패드",
            ProductCategory::DigitalDevice,
            100000,
            &[
                "https://cdn.example.com/media/1.png",
                "https://cdn.example.com/media/2.png",
            ],
        ))
        .expect("should create product");

    let fetched = repo
        .get_product_by_id(created.id)
        .expect("should fetch product")
        .expect("created product should exist");

    assert_eq!(fetched.title.as_str(), "아이패드");
    assert_eq!(fetched.category, ProductCategory::DigitalDevice);
    assert_eq!(fetched.sell_price.get(), 100000);
    assert_eq!(fetched.status, ProductStatus::Sell);
    assert_eq!(fetched.user_id, user_id);
    assert_eq!(
        fetched
            .images
            .iter()
            .map(|url| url.as_str())
            .collect::<Vec<_>>(),
        vec![
            "https://cdn.example.com/media/1.png",
            "https://cdn.example.com/media/2.png",
        ]
    );
}

#[test]
fn lists_newest_first_and_paginates() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let user_id = seed_user(&test_db.pool(), "코코", "coco@example.com");

    for (title, category, price) in [
        ("아이패드", ProductCategory::DigitalDevice, 100000),
        ("티셔츠", ProductCategory::Clothing, 20000),
        ("화분", ProductCategory::Plants, 5000),
    ] {
        repo.create_product(&new_product(user_id, title, category, price, &[]))
            .expect("should create product");
    }

    let (total, products) = repo
        .list_products(ProductListQuery::default())
        .expect("should list products");

    assert_eq!(total, 3);
    let titles: Vec<&str> = products.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["화분", "티셔츠", "아이패드"]);

    let (total, page) = repo
        .list_products(ProductListQuery::default().paginate(2, 2))
        .expect("should paginate products");

    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title.as_str(), "아이패드");
}

#[test]
fn filters_by_category() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let user_id = seed_user(&test_db.pool(), "춘식", "chunsik@example.com");

    repo.create_product(&new_product(
        user_id,
        "티셔츠",
        ProductCategory::Clothing,
        20000,
        &[],
    ))
    .expect("should create product");
    repo.create_product(&new_product(
        user_id,
        "화분",
        ProductCategory::Plants,
        5000,
        &[],
    ))
    .expect("should create product");

    let (total, products) = repo
        .list_products(ProductListQuery::default().category(ProductCategory::Plants))
        .expect("should list products");

    assert_eq!(total, 1);
    assert_eq!(products[0].title.as_str(), "화분");
}

#[test]
fn search_matches_title_or_description() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let user_id = seed_user(&test_db.pool(), "고잉홈", "goinghome@example.com");

    repo.create_product(&new_product(
        user_id,
        "아이패드",
        ProductCategory::DigitalDevice,
        100000,
        &[],
    ))
    .expect("should create product");
    repo.create_product(&new_product(
        user_id,
        "갤럭시탭",
        ProductCategory::DigitalDevice,
        80000,
        &[],
    ))
    .expect("should create product");

    let (total, products) = repo
        .search_products(
            ProductListQuery::default()
                .category(ProductCategory::DigitalDevice)
                .search("아이패드"),
        )
        .expect("should search products");

    assert_eq!(total, 1);
    assert_eq!(products[0].title.as_str(), "아이패드");

    // Description text is searched as well.
    let (total, _) = repo
        .search_products(ProductListQuery::default().search("갤럭시탭 팝니다"))
        .expect("should search products");
    assert_eq!(total, 1);
}

#[test]
fn update_replaces_fields_and_images() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let user_id = seed_user(&test_db.pool(), "코코", "coco@example.com");

    let created = repo
        .create_product(&new_product(
            user_id,
            "아이패드",
            ProductCategory::DigitalDevice,
            100000,
            &["https://cdn.example.com/media/old.png"],
        ))
        .expect("should create product");

    let affected = repo
        .update_product(
            created.id,
            &ProductUpdate {
                category: ProductCategory::DigitalDevice,
                title: ProductTitle::new("아이패드 프로").expect("valid title"),
                description: ProductDescription::new("가격 내렸습니다.")
                    .expect("valid description"),
                sell_price: SellPrice::new(90000).expect("valid price"),
                images: Some(vec![
                    ImageUrl::new("https://cdn.example.com/media/new.png").expect("valid url"),
                ]),
            },
        )
        .expect("should update product");
    assert_eq!(affected, 1);

    let updated = repo
        .get_product_by_id(created.id)
        .expect("should fetch product")
        .expect("updated product should exist");

    assert_eq!(updated.title.as_str(), "아이패드 프로");
    assert_eq!(updated.sell_price.get(), 90000);
    assert_eq!(updated.images.len(), 1);
    assert_eq!(updated.images[0].as_str(), "https://cdn.example.com/media/new.png");
}

#[test]
fn update_keeps_images_without_replacement() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let user_id = seed_user(&test_db.pool(), "코코", "coco@example.com");

    let created = repo
        .create_product(&new_product(
            user_id,
            "티셔츠",
            ProductCategory::Clothing,
            20000,
            &["https://cdn.example.com/media/shirt.png"],
        ))
        .expect("should create product");

    repo.update_product(
        created.id,
        &ProductUpdate {
            category: ProductCategory::Clothing,
            title: ProductTitle::new("티셔츠").expect("valid title"),
            description: ProductDescription::new("실착 1회 티셔츠 입니다.")
                .expect("valid description"),
            sell_price: SellPrice::new(15000).expect("valid price"),
            images: None,
        },
    )
    .expect("should update product");

    let updated = repo
        .get_product_by_id(created.id)
        .expect("should fetch product")
        .expect("updated product should exist");

    assert_eq!(updated.sell_price.get(), 15000);
    assert_eq!(updated.images.len(), 1);
}

#[test]
fn update_of_unknown_product_affects_no_rows() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let affected = repo
        .update_product(
            ProductId::new(99).expect("valid id"),
            &ProductUpdate {
                category: ProductCategory::Etc,
                title: ProductTitle::new("없는 상품").expect("valid title"),
                description: ProductDescription::new("없습니다.").expect("valid description"),
                sell_price: SellPrice::new(0).expect("valid price"),
                images: None,
            },
        )
        .expect("update should not fail");

    assert_eq!(affected, 0);
}

#[test]
fn delete_removes_product_and_image_rows() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let user_id = seed_user(&test_db.pool(), "코코", "coco@example.com");

    let created = repo
        .create_product(&new_product(
            user_id,
            "화분",
            ProductCategory::Plants,
            5000,
            &["https://cdn.example.com/media/plant.png"],
        ))
        .expect("should create product");

    let affected = repo
        .delete_product(created.id)
        .expect("should delete product");
    assert_eq!(affected, 1);

    assert!(
        repo.get_product_by_id(created.id)
            .expect("lookup should not fail")
            .is_none()
    );

    let mut conn = test_db.pool().get().expect("should acquire DB connection");
    let remaining: i64 = product_images::table
        .filter(product_images::product_id.eq(created.id.get()))
        .count()
        .get_result(&mut conn)
        .expect("image rows should be countable");
    assert_eq!(remaining, 0);
}
