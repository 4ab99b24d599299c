//! `sweetshop browse` - interactive, debounced name search.
//!
//! Every stdin line replaces the name filter. A query only reaches the server
//! once input has been quiet for the debounce delay, so typing a burst of
//! lines costs one search.

use super::shop::render_table;
use std::io::Write;
use std::time::Duration;
use sweetshop_client::{SweetApi, SweetCatalog, debounce};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Run until `input` ends. Returns the number of searches sent after the
/// initial listing.
pub async fn browse<A, R, W>(
    catalog: &mut SweetCatalog<A>,
    input: R,
    delay: Duration,
    out: &mut W,
) -> anyhow::Result<usize>
where
    A: SweetApi,
    R: AsyncBufRead + Unpin + Send + 'static,
    W: Write,
{
    write!(out, "{}", render_table(catalog.refresh().await?))?;
    writeln!(out, "Type a name to search (empty line clears, Ctrl-D quits).")?;
    out.flush()?;

    let (tx, mut debouncer) = debounce::<String>(delay, 64);
    let reader = tokio::spawn(async move {
        let mut lines = input.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let searched: anyhow::Result<usize> = async {
        let mut searches = 0;
        while let Some(query) = debouncer.next().await {
            catalog.set_name_filter(query.trim());
            searches += 1;
            match catalog.refresh().await {
                Ok(sweets) => write!(out, "{}", render_table(sweets))?,
                Err(e) => writeln!(out, "search failed: {e}")?,
            }
            out.flush()?;
        }
        Ok(searches)
    }
    .await;

    match searched {
        Ok(searches) => {
            reader.await?;
            Ok(searches)
        }
        Err(e) => {
            // stdin may never reach EOF; do not leave the reader behind.
            reader.abort();
            Err(e)
        }
    }
}
