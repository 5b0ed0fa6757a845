pub mod clicks;
pub mod hotels;
pub mod postgres;
pub mod redis;
pub mod restaurants;

pub use self::clicks::{ClickStore, PgClickStore};
pub use self::hotels::{HotelStore, PgHotelStore};
pub use self::postgres::{create_pool, run_migrations};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use self::restaurants::{PgRestaurantStore, RestaurantStore};
