use inews_core::{NewsSource, Result, SearchParams};
use inews_storage::Stores;
use tracing::{info, warn};

/// Fetch today's top headlines into a new batch, then prune batches that fell
/// outside the configured lookback window.
pub async fn get_headlines(source: &dyn NewsSource, stores: &Stores) -> Result<()> {
    let settings = stores.settings.load_headline_settings().await;
    info!(
        "Fetching {} {} headlines",
        settings.headline_size, settings.category
    );
    let articles = source.top_headlines(&settings).await?;
    stores.headlines.write_batch(&articles).await?;

    match stores.headlines.prune_older_than(settings.previous_days).await {
        Ok(0) => {}
        Ok(removed) => info!("Pruned {} stale headline batches", removed),
        Err(e) => warn!("Failed to prune headline batches: {}", e),
    }
    Ok(())
}

/// Run a search and replace the cached search results
pub async fn get_search_results(
    source: &dyn NewsSource,
    stores: &Stores,
    params: &SearchParams,
) -> Result<()> {
    info!("Searching for {:?}", params.keywords);
    let articles = source.search(params).await?;
    stores.search.write(&articles).await?;
    Ok(())
}
