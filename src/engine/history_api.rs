use super::Engine;

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::HistoryAPI,
    entities::{DeleteOutcome, DeleteStatus, HistorySummary, RouteData, SavedRoute},
    error::{record_not_found_error, Error},
    store::Collection,
};

#[async_trait]
impl HistoryAPI for Engine {
    fn summarize(&self, routes: &[SavedRoute]) -> HistorySummary {
        HistorySummary::from_routes(routes, Utc::now())
    }

    #[tracing::instrument(skip(self, routes), fields(routes = routes.len()))]
    async fn delete_at(
        &self,
        routes: &[SavedRoute],
        indices: &BTreeSet<usize>,
    ) -> Vec<DeleteOutcome> {
        let mut outcomes = Vec::with_capacity(indices.len());

        for &index in indices {
            let status = match routes.get(index) {
                None => {
                    tracing::warn!("index {} is out of range, skipping", index);
                    DeleteStatus::OutOfRange
                }
                Some(route) => {
                    match self
                        .store
                        .delete_record(Collection::SavedRoutes, route.id)
                        .await
                    {
                        Ok(()) => DeleteStatus::Deleted { id: route.id },
                        Err(err) => {
                            tracing::warn!("failed to delete route {}: {:?}", route.id, err);
                            DeleteStatus::Failed {
                                id: route.id,
                                code: err.code,
                                message: err.message,
                            }
                        }
                    }
                }
            };

            outcomes.push(DeleteOutcome { index, status });
        }

        outcomes
    }

    fn reconstruct(&self, route: &SavedRoute) -> RouteData {
        route.to_route_data()
    }

    #[tracing::instrument(skip(self, route))]
    async fn save_route(
        &self,
        route: RouteData,
        route_name: Option<String>,
    ) -> Result<SavedRoute, Error> {
        let saved = SavedRoute::from_route_data(&route, route_name, Utc::now());

        self.store
            .insert_record(
                Collection::SavedRoutes,
                saved.id,
                saved.created_date,
                serde_json::to_value(&saved)?,
            )
            .await?;

        tracing::info!("saved route {} with {} stops", saved.id, saved.stops.len());

        Ok(saved)
    }

    #[tracing::instrument(skip(self))]
    async fn list_routes(&self) -> Result<Vec<SavedRoute>, Error> {
        let records = self.store.list_records(Collection::SavedRoutes).await?;

        let routes: Vec<SavedRoute> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(route) => Some(route),
                Err(err) => {
                    tracing::warn!("skipping undecodable saved route: {}", err);
                    None
                }
            })
            .collect();

        Ok(routes)
    }

    #[tracing::instrument(skip(self))]
    async fn find_route(&self, id: Uuid) -> Result<SavedRoute, Error> {
        let record = self
            .store
            .find_record(Collection::SavedRoutes, id)
            .await?
            .ok_or_else(record_not_found_error)?;

        Ok(serde_json::from_value(record)?)
    }

    #[tracing::instrument(skip(self))]
    async fn history_summary(&self) -> Result<HistorySummary, Error> {
        let routes = self.list_routes().await?;

        Ok(self.summarize(&routes))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use chrono::Utc;
    use serde_json::json;
    use tokio_test::block_on;
    use uuid::Uuid;

    use crate::{
        api::HistoryAPI,
        engine::testing::{engine, engine_with, FailingStore},
        entities::{Coordinates, DeleteStatus, Distance, Leg, RouteData, SavedRoute, Stop},
        store::{Collection, RecordStore},
    };

    fn route_data(stops: &[&str], miles: f64) -> RouteData {
        RouteData {
            stops: stops
                .iter()
                .enumerate()
                .map(|(i, name)| Stop {
                    name: name.to_string(),
                    address: format!("{} {} avenue", i + 1, name),
                    coordinates: Coordinates {
                        latitude: 40.0 + i as f64 * 0.01,
                        longitude: -74.0 - i as f64 * 0.01,
                    },
                })
                .collect(),
            legs: vec![Leg {
                distance: Distance::miles(miles),
                minutes: 20,
                directions: vec!["Head north".into()],
            }],
            total_distance: Distance::miles(miles),
            estimated_minutes: 20,
        }
    }

    #[test]
    fn save_list_and_reconstruct_test() {
        let (engine, _) = engine();

        let first = route_data(&["home", "school", "office"], 12.75);
        let second = route_data(&["office", "gym"], 3.5);

        block_on(engine.save_route(first.clone(), Some("Morning".into()))).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let saved = block_on(engine.save_route(second.clone(), None)).unwrap();

        let routes = block_on(engine.list_routes()).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0], saved);
        assert_eq!(routes[1].route_name.as_deref(), Some("Morning"));

        assert_eq!(engine.reconstruct(&routes[0]), second);
        assert_eq!(engine.reconstruct(&routes[1]), first);

        let found = block_on(engine.find_route(saved.id)).unwrap();
        assert_eq!(found, saved);
    }

    #[test]
    fn find_missing_route_test() {
        let (engine, _) = engine();

        let err = block_on(engine.find_route(Uuid::new_v4())).unwrap_err();
        assert_eq!(err.code, 102);
    }

    #[test]
    fn history_summary_test() {
        let (engine, _) = engine();

        let summary = block_on(engine.history_summary()).unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_distance_saved, "0.0");
        assert_eq!(summary.most_recent_label, "None");

        block_on(engine.save_route(route_data(&["a", "b"], 10.0), None)).unwrap();
        block_on(engine.save_route(route_data(&["c", "d"], 5.5), None)).unwrap();

        let summary = block_on(engine.history_summary()).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_distance_saved, "15.5");
        assert_eq!(summary.most_recent_label, "just now");
    }

    #[test]
    fn undecodable_records_are_skipped_test() {
        let (engine, store) = engine();

        block_on(engine.save_route(route_data(&["a", "b"], 1.0), None)).unwrap();
        block_on(store.insert_record(
            Collection::SavedRoutes,
            Uuid::new_v4(),
            Utc::now(),
            json!({"unexpected": true}),
        ))
        .unwrap();

        let routes = block_on(engine.list_routes()).unwrap();
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn delete_at_out_of_range_test() {
        let (engine, _) = engine();

        for name in ["a", "b", "c"] {
            block_on(engine.save_route(route_data(&[name], 1.0), None)).unwrap();
        }

        let routes = block_on(engine.list_routes()).unwrap();
        let indices: BTreeSet<usize> = [0, 2, 3, 99].into_iter().collect();

        let outcomes = block_on(engine.delete_at(&routes, &indices));

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].status, DeleteStatus::Deleted { id: routes[0].id });
        assert_eq!(outcomes[1].status, DeleteStatus::Deleted { id: routes[2].id });
        assert_eq!(outcomes[2].status, DeleteStatus::OutOfRange);
        assert_eq!(outcomes[3].index, 99);
        assert_eq!(outcomes[3].status, DeleteStatus::OutOfRange);

        let remaining = block_on(engine.list_routes()).unwrap();
        assert_eq!(remaining, vec![routes[1].clone()]);
    }

    #[test]
    fn delete_at_reports_each_failure_test() {
        let store = Arc::new(FailingStore::default());
        let engine = engine_with(store.clone(), true);

        for name in ["a", "b", "c"] {
            block_on(engine.save_route(route_data(&[name], 2.0), None)).unwrap();
        }

        let routes = block_on(engine.list_routes()).unwrap();
        store.fail_delete_of(routes[1].id);

        let indices: BTreeSet<usize> = [0, 1, 2].into_iter().collect();
        let outcomes = block_on(engine.delete_at(&routes, &indices));

        assert!(outcomes[0].is_deleted());
        assert_eq!(
            outcomes[1].status,
            DeleteStatus::Failed {
                id: routes[1].id,
                code: 2,
                message: "database error".into(),
            }
        );
        assert!(outcomes[2].is_deleted());

        let remaining = block_on(engine.list_routes()).unwrap();
        assert_eq!(remaining, vec![routes[1].clone()]);
    }

    #[test]
    fn delete_at_already_deleted_route_test() {
        let (engine, _) = engine();

        let saved: SavedRoute = block_on(engine.save_route(route_data(&["a"], 1.0), None)).unwrap();
        let routes = vec![saved.clone()];
        let indices: BTreeSet<usize> = [0].into_iter().collect();

        let outcomes = block_on(engine.delete_at(&routes, &indices));
        assert!(outcomes[0].is_deleted());

        let outcomes = block_on(engine.delete_at(&routes, &indices));
        assert_eq!(
            outcomes[0].status,
            DeleteStatus::Failed {
                id: saved.id,
                code: 102,
                message: "record not found".into(),
            }
        );
    }
}
