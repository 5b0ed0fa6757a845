use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppResult,
    models::{Hotel, HotelFilter},
};

/// Rows per upsert statement; keeps bind parameters under Postgres' 65535 limit
const UPSERT_BATCH_SIZE: usize = 1000;

const HOTEL_COLUMNS: &str = r#"
    id, city, name, rating, address,
    price_min, price_max, price_avg,
    link, lat, lng,
    reviews, phone, detailed_address, ranking,
    featured_image, highlights, providers
"#;

/// Read and write access to the `hotels` table
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HotelStore: Send + Sync {
    /// Hotels in `city` (exact, case-sensitive) whose highlights are not null
    async fn hotels_with_highlights(&self, city: &str) -> AppResult<Vec<Hotel>>;

    /// Hotels matching the filter, best rated first, then cheapest
    async fn filter_hotels(&self, filter: &HotelFilter) -> AppResult<Vec<Hotel>>;

    /// Number of hotels matching the filter
    async fn count_hotels(&self, filter: &HotelFilter) -> AppResult<i64>;

    /// Inserts or replaces hotels by id, returning the number of rows written
    async fn upsert_hotels(&self, hotels: &[Hotel]) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct PgHotelStore {
    pool: PgPool,
}

impl PgHotelStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends the WHERE clause shared by the filter and count queries
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &HotelFilter) {
    builder
        .push(" WHERE rating >= ")
        .push_bind(filter.rating_min)
        .push(" AND rating <= ")
        .push_bind(filter.rating_max);

    if let Some(price_min) = filter.price_min {
        builder.push(" AND price_avg >= ").push_bind(price_min);
    }
    if let Some(price_max) = filter.price_max {
        builder.push(" AND price_avg <= ").push_bind(price_max);
    }
}

#[async_trait::async_trait]
impl HotelStore for PgHotelStore {
    async fn hotels_with_highlights(&self, city: &str) -> AppResult<Vec<Hotel>> {
        let sql = format!(
            "SELECT {} FROM hotels WHERE city = $1 AND highlights IS NOT NULL",
            HOTEL_COLUMNS
        );

        let hotels = sqlx::query_as::<_, Hotel>(&sql)
            .bind(city)
            .fetch_all(&self.pool)
            .await?;

        Ok(hotels)
    }

    async fn filter_hotels(&self, filter: &HotelFilter) -> AppResult<Vec<Hotel>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(HOTEL_COLUMNS).push(" FROM hotels");
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY rating DESC, price_avg ASC");

        let hotels = builder
            .build_query_as::<Hotel>()
            .fetch_all(&self.pool)
            .await?;

        Ok(hotels)
    }

    async fn count_hotels(&self, filter: &HotelFilter) -> AppResult<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM hotels");
        push_filter(&mut builder, filter);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn upsert_hotels(&self, hotels: &[Hotel]) -> AppResult<u64> {
        let mut written = 0;

        for batch in hotels.chunks(UPSERT_BATCH_SIZE) {
            let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO hotels (");
            builder.push(HOTEL_COLUMNS).push(") ");

            builder.push_values(batch, |mut row, hotel| {
                row.push_bind(hotel.id)
                    .push_bind(hotel.city.clone())
                    .push_bind(hotel.name.clone())
                    .push_bind(hotel.rating)
                    .push_bind(hotel.address.clone())
                    .push_bind(hotel.price_min)
                    .push_bind(hotel.price_max)
                    .push_bind(hotel.price_avg)
                    .push_bind(hotel.link.clone())
                    .push_bind(hotel.lat)
                    .push_bind(hotel.lng)
                    .push_bind(hotel.reviews)
                    .push_bind(hotel.phone.clone())
                    .push_bind(hotel.detailed_address.clone())
                    .push_bind(hotel.ranking.clone())
                    .push_bind(hotel.featured_image.clone())
                    .push_bind(hotel.highlights.clone())
                    .push_bind(hotel.providers.clone());
            });

            builder.push(
                r#"
                ON CONFLICT (id) DO UPDATE SET
                    city = EXCLUDED.city,
                    name = EXCLUDED.name,
                    rating = EXCLUDED.rating,
                    address = EXCLUDED.address,
                    price_min = EXCLUDED.price_min,
                    price_max = EXCLUDED.price_max,
                    price_avg = EXCLUDED.price_avg,
                    link = EXCLUDED.link,
                    lat = EXCLUDED.lat,
                    lng = EXCLUDED.lng,
                    reviews = EXCLUDED.reviews,
                    phone = EXCLUDED.phone,
                    detailed_address = EXCLUDED.detailed_address,
                    ranking = EXCLUDED.ranking,
                    featured_image = EXCLUDED.featured_image,
                    highlights = EXCLUDED.highlights,
                    providers = EXCLUDED.providers
                "#,
            );

            let result = builder.build().execute(&self.pool).await?;
            written += result.rows_affected();
        }

        Ok(written)
    }
}
