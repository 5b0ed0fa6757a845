/// Read-through caching for an async computation returning `AppResult<T>`.
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues its value for writing with `$ttl` seconds to live, and
/// returns it. Use it as the tail expression of a function returning
/// `AppResult<T>`; errors from the cache read or the block propagate with `?`.
///
/// ```rust,ignore
/// async fn fetch_page(&self, key: CacheKey) -> AppResult<serde_json::Value> {
///     cached!(self.cache, key, PAGE_CACHE_TTL, async move {
///         self.request_page(&key).await
///     })
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(hit) = $cache.get_from_cache(&$key).await? {
            Ok(hit)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
