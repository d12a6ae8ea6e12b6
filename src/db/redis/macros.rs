/// Returns a cached value or computes, stores and returns it.
///
/// Evaluates to `Result<T, E>`. On a miss the block runs; an error is returned
/// as-is and nothing is cached. A computed value is queued for a background write.
///
/// # Arguments
/// * `$cache`: a `Cache` (read failures count as misses).
/// * `$key`: the `CacheKey` to read and write.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: a future producing `Result<T, E>` on a miss.
///
/// # Example
/// ```rust,ignore
/// let results: Vec<DirectorRef> = cached!(cache, CacheKey::DirectorSearch(query.clone()), 3600, async {
///     fetch_directors(&query).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await {
            Ok(cached)
        } else {
            match $block.await {
                Ok(value) => {
                    $cache.set_in_background(&key, &value, $ttl);
                    Ok(value)
                }
                Err(e) => Err(e),
            }
        }
    }};
}
