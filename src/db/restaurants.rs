use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppResult,
    models::{Restaurant, RestaurantFilter},
};

const UPSERT_BATCH_SIZE: usize = 1000;

const RESTAURANT_COLUMNS: &str = r#"
    id, city, name, rating, reviews, price_range,
    price_min, price_max,
    is_sponsored, menu_link, reservation_link,
    link, lat, lng, featured_image,
    has_delivery, is_premium, cuisines
"#;

/// Read and write access to the `restaurants` table
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RestaurantStore: Send + Sync {
    /// One page of restaurants matching the filter, best rated first
    async fn filter_restaurants(&self, filter: &RestaurantFilter) -> AppResult<Vec<Restaurant>>;

    /// Inserts or replaces restaurants by id, returning the number of rows written
    async fn upsert_restaurants(&self, restaurants: &[Restaurant]) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct PgRestaurantStore {
    pool: PgPool,
}

impl PgRestaurantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RestaurantStore for PgRestaurantStore {
    async fn filter_restaurants(&self, filter: &RestaurantFilter) -> AppResult<Vec<Restaurant>> {
        let offset = filter.offset()?;

        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder
            .push(RESTAURANT_COLUMNS)
            .push(" FROM restaurants WHERE rating >= ")
            .push_bind(filter.rating_min)
            .push(" AND rating <= ")
            .push_bind(filter.rating_max);

        if let Some(price_min) = filter.price_min {
            builder.push(" AND price_min >= ").push_bind(price_min);
        }
        if let Some(price_max) = filter.price_max {
            builder.push(" AND price_max <= ").push_bind(price_max);
        }

        builder
            .push(" ORDER BY rating DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let restaurants = builder
            .build_query_as::<Restaurant>()
            .fetch_all(&self.pool)
            .await?;

        Ok(restaurants)
    }

    async fn upsert_restaurants(&self, restaurants: &[Restaurant]) -> AppResult<u64> {
        let mut written = 0;

        for batch in restaurants.chunks(UPSERT_BATCH_SIZE) {
            let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO restaurants (");
            builder.push(RESTAURANT_COLUMNS).push(") ");

            builder.push_values(batch, |mut row, r| {
                row.push_bind(r.id)
                    .push_bind(r.city.clone())
                    .push_bind(r.name.clone())
                    .push_bind(r.rating)
                    .push_bind(r.reviews)
                    .push_bind(r.price_range.clone())
                    .push_bind(r.price_min)
                    .push_bind(r.price_max)
                    .push_bind(r.is_sponsored)
                    .push_bind(r.menu_link.clone())
                    .push_bind(r.reservation_link.clone())
                    .push_bind(r.link.clone())
                    .push_bind(r.lat)
                    .push_bind(r.lng)
                    .push_bind(r.featured_image.clone())
                    .push_bind(r.has_delivery)
                    .push_bind(r.is_premium)
                    .push_bind(r.cuisines.clone());
            });

            builder.push(
                r#"
                ON CONFLICT (id) DO UPDATE SET
                    city = EXCLUDED.city,
                    name = EXCLUDED.name,
                    rating = EXCLUDED.rating,
                    reviews = EXCLUDED.reviews,
                    price_range = EXCLUDED.price_range,
                    price_min = EXCLUDED.price_min,
                    price_max = EXCLUDED.price_max,
                    is_sponsored = EXCLUDED.is_sponsored,
                    menu_link = EXCLUDED.menu_link,
                    reservation_link = EXCLUDED.reservation_link,
                    link = EXCLUDED.link,
                    lat = EXCLUDED.lat,
                    lng = EXCLUDED.lng,
                    featured_image = EXCLUDED.featured_image,
                    has_delivery = EXCLUDED.has_delivery,
                    is_premium = EXCLUDED.is_premium,
                    cuisines = EXCLUDED.cuisines
                "#,
            );

            let result = builder.build().execute(&self.pool).await?;
            written += result.rows_affected();
        }

        Ok(written)
    }
}
