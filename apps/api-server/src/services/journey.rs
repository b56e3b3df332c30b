//! Journey service: validation and query shaping for commute legs.

use std::sync::Arc;

use bson::oid::ObjectId;
use data_store::{DataStore, JourneyFilter, JourneyPatch, JourneyShape};
use entities::{Journey, TravelMode};
use protocol::requests::{CreateJourneyRequest, FindSimilarJourneysRequest, UpdateJourneyRequest};
use protocol::{JourneyStats, ModeBreakdown};

use crate::error::{ServerError, ServerResult};

/// Validates journeys and shapes store queries.
pub struct JourneyService<S> {
    store: Arc<S>,
}

impl<S: DataStore> JourneyService<S> {
    /// Creates a new journey service backed by `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a journey owned by `owner` after validating every field.
    pub async fn create(
        &self,
        owner: ObjectId,
        request: CreateJourneyRequest,
    ) -> ServerResult<Journey> {
        let shape = validate_journey_data(
            request.travel_mode.as_deref(),
            request.route_id.as_deref(),
            request.start_point.as_deref(),
            request.end_point.as_deref(),
        )?;

        let journey = Journey::new(
            owner,
            shape.travel_mode,
            shape.route_id,
            shape.start_point,
            shape.end_point,
        )
        .with_times(request.departure_time, request.arrival_time);

        let journey = self.store.create_journey(journey).await?;

        tracing::info!(journey_id = %journey.id, "Journey created");

        Ok(journey)
    }

    /// Fetches a journey by its identifier.
    pub async fn get_by_id(&self, id: &str) -> ServerResult<Journey> {
        let id = parse_journey_id(id)?;

        self.store
            .get_journey(id)
            .await?
            .ok_or_else(|| ServerError::NotFound("Journey not found".to_string()))
    }

    /// Lists journeys owned by `owner`, oldest first.
    pub async fn list_for_user(&self, owner: ObjectId) -> ServerResult<Vec<Journey>> {
        Ok(self.store.list_journeys_by_user(owner).await?)
    }

    /// Lists journeys, optionally restricted to one travel mode.
    pub async fn list(&self, travel_mode: Option<&str>) -> ServerResult<Vec<Journey>> {
        let mut filter = JourneyFilter::default();
        if let Some(mode) = travel_mode {
            filter = filter.with_mode(parse_travel_mode(mode)?);
        }
        Ok(self.store.list_journeys(filter).await?)
    }

    /// Applies a partial update to a journey owned by `owner`.
    ///
    /// Absence and foreign ownership answer alike.
    pub async fn update(
        &self,
        id: &str,
        owner: ObjectId,
        request: UpdateJourneyRequest,
    ) -> ServerResult<Journey> {
        let id = parse_journey_id(id)?;
        let patch = validate_journey_update_data(request)?;

        let updated = self
            .store
            .update_journey(id, owner, patch)
            .await?
            .ok_or_else(|| ServerError::NotFound("Journey not found".to_string()))?;

        tracing::info!(journey_id = %id, "Journey updated");

        Ok(updated)
    }

    /// Deletes a journey owned by `owner`.
    pub async fn delete(&self, id: &str, owner: ObjectId) -> ServerResult<()> {
        let id = parse_journey_id(id)?;

        if !self.store.delete_journey(id, owner).await? {
            return Err(ServerError::NotFound("Journey not found".to_string()));
        }

        tracing::info!(journey_id = %id, "Journey deleted");

        Ok(())
    }

    /// Lists journeys on an exact travel mode + route pair.
    pub async fn by_route(&self, mode: &str, route_id: &str) -> ServerResult<Vec<Journey>> {
        let mode = parse_travel_mode(mode)?;
        Ok(self.store.find_journeys_by_route(mode, route_id).await?)
    }

    /// Finds journeys matching the supplied shape, excluding `owner`'s own.
    pub async fn find_similar(
        &self,
        owner: ObjectId,
        request: FindSimilarJourneysRequest,
    ) -> ServerResult<Vec<Journey>> {
        let shape = validate_journey_data(
            request.travel_mode.as_deref(),
            request.route_id.as_deref(),
            request.start_point.as_deref(),
            request.end_point.as_deref(),
        )?;

        Ok(self.store.find_similar_journeys(owner, &shape).await?)
    }

    /// Aggregates journey counts for an optional user scope.
    ///
    /// The four count queries are issued concurrently and awaited jointly;
    /// results are assembled positionally. Total and per-mode counts are
    /// independent filters, not a partition.
    pub async fn stats(&self, user_id: Option<ObjectId>) -> ServerResult<JourneyStats> {
        let scope = JourneyFilter::for_user(user_id);

        let (total, bus, tube, overground) = tokio::try_join!(
            self.store.count_journeys(scope.clone()),
            self.store
                .count_journeys(scope.clone().with_mode(TravelMode::Bus)),
            self.store
                .count_journeys(scope.clone().with_mode(TravelMode::Tube)),
            self.store
                .count_journeys(scope.with_mode(TravelMode::Overground)),
        )?;

        Ok(JourneyStats {
            total_journeys: total,
            journeys_by_mode: ModeBreakdown {
                bus,
                tube,
                overground,
            },
        })
    }
}

fn parse_journey_id(id: &str) -> ServerResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| ServerError::Validation("Invalid journey ID format".to_string()))
}

fn parse_travel_mode(value: &str) -> ServerResult<TravelMode> {
    TravelMode::parse(value).ok_or_else(|| {
        let valid = TravelMode::ALL.map(|m| m.as_str()).join(", ");
        ServerError::Validation(format!("Invalid travel mode. Valid modes are: {valid}"))
    })
}

fn non_empty(field: &str, value: &str) -> ServerResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServerError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn check_endpoints_differ(start: &str, end: &str) -> ServerResult<()> {
    if start.to_lowercase() == end.to_lowercase() {
        return Err(ServerError::Validation(
            "Start point and end point cannot be the same".to_string(),
        ));
    }
    Ok(())
}

/// Validates a complete journey shape: presence, enum membership, non-empty
/// fields and distinct endpoints, in that order.
fn validate_journey_data(
    travel_mode: Option<&str>,
    route_id: Option<&str>,
    start_point: Option<&str>,
    end_point: Option<&str>,
) -> ServerResult<JourneyShape> {
    let (Some(travel_mode), Some(route_id), Some(start_point), Some(end_point)) =
        (travel_mode, route_id, start_point, end_point)
    else {
        return Err(ServerError::Validation(
            "All journey fields are required".to_string(),
        ));
    };

    let travel_mode = parse_travel_mode(travel_mode)?;
    let route_id = non_empty("Route ID", route_id)?;
    let start_point = non_empty("Start point", start_point)?;
    let end_point = non_empty("End point", end_point)?;
    check_endpoints_differ(&start_point, &end_point)?;

    Ok(JourneyShape {
        travel_mode,
        route_id,
        start_point,
        end_point,
    })
}

/// Validates a partial update: the payload must not be empty, per-field
/// checks apply only to present fields, and the endpoint equality check only
/// when both endpoints are in the payload.
fn validate_journey_update_data(request: UpdateJourneyRequest) -> ServerResult<JourneyPatch> {
    let UpdateJourneyRequest {
        travel_mode,
        route_id,
        start_point,
        end_point,
        departure_time,
        arrival_time,
    } = request;

    if travel_mode.is_none()
        && route_id.is_none()
        && start_point.is_none()
        && end_point.is_none()
        && departure_time.is_none()
        && arrival_time.is_none()
    {
        return Err(ServerError::Validation(
            "At least one field must be provided for update".to_string(),
        ));
    }

    let travel_mode = travel_mode.as_deref().map(parse_travel_mode).transpose()?;
    let route_id = route_id
        .as_deref()
        .map(|v| non_empty("Route ID", v))
        .transpose()?;
    let start_point = start_point
        .as_deref()
        .map(|v| non_empty("Start point", v))
        .transpose()?;
    let end_point = end_point
        .as_deref()
        .map(|v| non_empty("End point", v))
        .transpose()?;

    if let (Some(start), Some(end)) = (&start_point, &end_point) {
        check_endpoints_differ(start, end)?;
    }

    Ok(JourneyPatch {
        travel_mode,
        route_id,
        start_point,
        end_point,
        departure_time,
        arrival_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_store::MemoryStore;

    fn service() -> JourneyService<MemoryStore> {
        JourneyService::new(Arc::new(MemoryStore::new()))
    }

    fn valid_request() -> CreateJourneyRequest {
        CreateJourneyRequest {
            travel_mode: Some("BUS".to_string()),
            route_id: Some("159".to_string()),
            start_point: Some("Brixton".to_string()),
            end_point: Some("Oxford Circus".to_string()),
            departure_time: None,
            arrival_time: None,
        }
    }

    fn expect_validation<T: std::fmt::Debug>(result: ServerResult<T>, message: &str) {
        match result {
            Err(ServerError::Validation(m)) => assert_eq!(m, message),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    fn expect_not_found<T: std::fmt::Debug>(result: ServerResult<T>, message: &str) {
        match result {
            Err(ServerError::NotFound(m)) => assert_eq!(m, message),
            other => panic!("expected not-found failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_requires_every_field() {
        let service = service();
        let owner = ObjectId::new();

        for missing in ["travel_mode", "route_id", "start_point", "end_point"] {
            let mut request = valid_request();
            match missing {
                "travel_mode" => request.travel_mode = None,
                "route_id" => request.route_id = None,
                "start_point" => request.start_point = None,
                _ => request.end_point = None,
            }

            expect_validation(
                service.create(owner, request).await,
                "All journey fields are required",
            );
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_mode() {
        let request = CreateJourneyRequest {
            travel_mode: Some("TRAM".to_string()),
            ..valid_request()
        };

        expect_validation(
            service().create(ObjectId::new(), request).await,
            "Invalid travel mode. Valid modes are: BUS, TUBE, OVERGROUND",
        );
    }

    #[tokio::test]
    async fn test_create_rejects_matching_endpoints_case_insensitively() {
        let request = CreateJourneyRequest {
            start_point: Some("Station A".to_string()),
            end_point: Some("station a".to_string()),
            ..valid_request()
        };

        expect_validation(
            service().create(ObjectId::new(), request).await,
            "Start point and end point cannot be the same",
        );
    }

    #[tokio::test]
    async fn test_create_rejects_blank_route() {
        let request = CreateJourneyRequest {
            route_id: Some("   ".to_string()),
            ..valid_request()
        };

        expect_validation(
            service().create(ObjectId::new(), request).await,
            "Route ID cannot be empty",
        );
    }

    #[tokio::test]
    async fn test_create_persists_and_trims() {
        let service = service();
        let owner = ObjectId::new();
        let request = CreateJourneyRequest {
            route_id: Some("  159 ".to_string()),
            ..valid_request()
        };

        let journey = service.create(owner, request).await.unwrap();

        assert_eq!(journey.route_id, "159");
        assert_eq!(journey.user_id, owner);
        let fetched = service.get_by_id(&journey.id.to_hex()).await.unwrap();
        assert_eq!(fetched.id, journey.id);
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_id() {
        expect_validation(
            service().get_by_id("not-a-hex-id").await,
            "Invalid journey ID format",
        );
    }

    #[tokio::test]
    async fn test_get_absent_id_is_not_found() {
        expect_not_found(
            service().get_by_id(&ObjectId::new().to_hex()).await,
            "Journey not found",
        );
    }

    #[tokio::test]
    async fn test_update_rejects_empty_payload() {
        let service = service();
        let owner = ObjectId::new();
        let journey = service.create(owner, valid_request()).await.unwrap();

        expect_validation(
            service
                .update(&journey.id.to_hex(), owner, UpdateJourneyRequest::default())
                .await,
            "At least one field must be provided for update",
        );
    }

    #[tokio::test]
    async fn test_update_applies_partial_fields() {
        let service = service();
        let owner = ObjectId::new();
        let journey = service.create(owner, valid_request()).await.unwrap();

        let request = UpdateJourneyRequest {
            route_id: Some("59".to_string()),
            ..UpdateJourneyRequest::default()
        };
        let updated = service
            .update(&journey.id.to_hex(), owner, request)
            .await
            .unwrap();

        assert_eq!(updated.route_id, "59");
        assert_eq!(updated.start_point, "Brixton");
        assert_eq!(updated.end_point, "Oxford Circus");
    }

    #[tokio::test]
    async fn test_update_checks_endpoints_only_when_both_present() {
        let service = service();
        let owner = ObjectId::new();
        let journey = service.create(owner, valid_request()).await.unwrap();

        // only one endpoint in the payload: no equality check against the
        // stored value
        let request = UpdateJourneyRequest {
            start_point: Some("Oxford Circus".to_string()),
            ..UpdateJourneyRequest::default()
        };
        assert!(
            service
                .update(&journey.id.to_hex(), owner, request)
                .await
                .is_ok()
        );

        let request = UpdateJourneyRequest {
            start_point: Some("Camden".to_string()),
            end_point: Some("CAMDEN".to_string()),
            ..UpdateJourneyRequest::default()
        };
        expect_validation(
            service.update(&journey.id.to_hex(), owner, request).await,
            "Start point and end point cannot be the same",
        );
    }

    #[tokio::test]
    async fn test_update_of_foreign_journey_is_not_found() {
        let service = service();
        let owner = ObjectId::new();
        let journey = service.create(owner, valid_request()).await.unwrap();

        let request = UpdateJourneyRequest {
            route_id: Some("59".to_string()),
            ..UpdateJourneyRequest::default()
        };
        expect_not_found(
            service
                .update(&journey.id.to_hex(), ObjectId::new(), request)
                .await,
            "Journey not found",
        );
    }

    #[tokio::test]
    async fn test_delete_of_foreign_journey_is_not_found() {
        let service = service();
        let owner = ObjectId::new();
        let journey = service.create(owner, valid_request()).await.unwrap();

        expect_not_found(
            service.delete(&journey.id.to_hex(), ObjectId::new()).await,
            "Journey not found",
        );

        service.delete(&journey.id.to_hex(), owner).await.unwrap();
        expect_not_found(
            service.get_by_id(&journey.id.to_hex()).await,
            "Journey not found",
        );
    }

    #[tokio::test]
    async fn test_by_route_validates_mode() {
        expect_validation(
            service().by_route("WALK", "159").await,
            "Invalid travel mode. Valid modes are: BUS, TUBE, OVERGROUND",
        );
    }

    #[tokio::test]
    async fn test_similar_validates_full_shape() {
        let request = FindSimilarJourneysRequest {
            travel_mode: Some("BUS".to_string()),
            route_id: None,
            start_point: Some("Brixton".to_string()),
            end_point: Some("Oxford Circus".to_string()),
        };

        expect_validation(
            service().find_similar(ObjectId::new(), request).await,
            "All journey fields are required",
        );
    }

    #[tokio::test]
    async fn test_similar_returns_other_users_matches() {
        let service = service();
        let owner = ObjectId::new();
        let other = ObjectId::new();

        service.create(owner, valid_request()).await.unwrap();
        service.create(other, valid_request()).await.unwrap();

        let request = FindSimilarJourneysRequest {
            travel_mode: Some("BUS".to_string()),
            route_id: Some("159".to_string()),
            start_point: Some("Brixton".to_string()),
            end_point: Some("Oxford Circus".to_string()),
        };
        let similar = service.find_similar(owner, request).await.unwrap();

        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].user_id, other);
    }

    #[tokio::test]
    async fn test_stats_counts_by_mode() {
        let service = service();
        let owner = ObjectId::new();

        service.create(owner, valid_request()).await.unwrap();
        service
            .create(
                owner,
                CreateJourneyRequest {
                    travel_mode: Some("BUS".to_string()),
                    route_id: Some("73".to_string()),
                    ..valid_request()
                },
            )
            .await
            .unwrap();
        service
            .create(
                owner,
                CreateJourneyRequest {
                    travel_mode: Some("TUBE".to_string()),
                    route_id: Some("victoria".to_string()),
                    ..valid_request()
                },
            )
            .await
            .unwrap();
        service
            .create(ObjectId::new(), valid_request())
            .await
            .unwrap();

        let scoped = service.stats(Some(owner)).await.unwrap();
        assert_eq!(
            scoped,
            JourneyStats {
                total_journeys: 3,
                journeys_by_mode: ModeBreakdown {
                    bus: 2,
                    tube: 1,
                    overground: 0,
                },
            }
        );

        let unscoped = service.stats(None).await.unwrap();
        assert_eq!(unscoped.total_journeys, 4);
        assert_eq!(unscoped.journeys_by_mode.bus, 3);
    }
}
