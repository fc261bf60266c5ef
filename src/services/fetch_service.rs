use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::api::feeds::{FeatureCollection, FeedClient, FeedError};
use crate::services::map_service::MapSession;

/// Which feed a finished fetch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Earthquakes,
    Plates,
}

/// Fetch both feeds concurrently and hand each result to the session as it arrives
///
/// Completion order is not guaranteed and does not matter: each feed fills its own overlay.
pub async fn load_layers(client: &FeedClient, session: &mut MapSession) {
    let mut fetches: JoinSet<(Feed, Result<FeatureCollection, FeedError>)> = JoinSet::new();

    let quakes_client = client.clone();
    fetches.spawn(async move { (Feed::Earthquakes, quakes_client.get_earthquakes().await) });

    let plates_client = client.clone();
    fetches.spawn(async move { (Feed::Plates, plates_client.get_plate_boundaries().await) });

    while let Some(joined) = fetches.join_next().await {
        match joined {
            Ok((feed, result)) => {
                debug!("{:?} fetch finished", feed);
                match feed {
                    Feed::Earthquakes => session.apply_earthquakes(result),
                    Feed::Plates => session.apply_plates(result),
                }
            }
            // The overlay stays Pending and is reported as not loaded
            Err(e) => error!("Fetch task did not complete: {}", e),
        }
    }
}
