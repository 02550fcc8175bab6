use std::collections::HashMap;

use model::entities::{competition, sport};
use tracing::{debug, info, instrument, warn};

use super::{ApiService, CompetitionView};
use crate::error::{ApiError, ApiResult};
use crate::store::NewCompetition;

impl ApiService {
    #[instrument(skip(self))]
    pub async fn create_sport(&self, name: &str) -> ApiResult<sport::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Sport name cannot be blank".to_string()));
        }
        if self.sports.find_by_name(name).await?.is_some() {
            warn!("Sport {} already exists", name);
            return Err(ApiError::Conflict(format!("Sport {name} already exists")));
        }
        let sport = self.sports.create(name.to_string()).await?;
        info!("Created sport {}", sport.id);
        Ok(sport)
    }

    #[instrument(skip(self))]
    pub async fn get_sport(&self, id: i32) -> ApiResult<sport::Model> {
        self.sports
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Sport", id))
    }

    pub async fn list_sports(&self) -> ApiResult<Vec<sport::Model>> {
        Ok(self.sports.list().await?)
    }

    /// Fails with a conflict while competitions or pronostics still use the sport.
    #[instrument(skip(self))]
    pub async fn delete_sport(&self, id: i32) -> ApiResult<()> {
        let sport = self.get_sport(id).await?;
        let competitions = self.competitions.count_by_sport(id).await?;
        let pronostics = self.pronostics.count_by_sport(id).await?;
        if competitions > 0 || pronostics > 0 {
            warn!(competitions, pronostics, "Sport {} is still referenced", id);
            return Err(ApiError::Conflict(format!(
                "Sport {} is still used by {competitions} competitions and {pronostics} pronostics",
                sport.name
            )));
        }
        if !self.sports.delete(id).await? {
            return Err(ApiError::not_found("Sport", id));
        }
        info!("Deleted sport {}", id);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_competition(&self, new: NewCompetition) -> ApiResult<CompetitionView> {
        if new.end_at < new.start_at {
            return Err(ApiError::Validation(
                "Competition cannot end before it starts".to_string(),
            ));
        }
        let sport = self.sports.find_by_id(new.sport_id).await?.ok_or_else(|| {
            ApiError::Validation(format!("Sport with ID {} does not exist", new.sport_id))
        })?;

        let competition = self.competitions.create(new).await?;
        info!("Created competition {}", competition.id);
        Ok(CompetitionView { competition, sport })
    }

    #[instrument(skip(self))]
    pub async fn get_competition(&self, id: i32) -> ApiResult<CompetitionView> {
        let competition = self
            .competitions
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Competition", id))?;
        let mut views = self.competition_views(vec![competition]).await?;
        views.pop().ok_or_else(|| ApiError::not_found("Competition", id))
    }

    pub async fn list_competitions(&self) -> ApiResult<Vec<CompetitionView>> {
        let competitions = self.competitions.list().await?;
        self.competition_views(competitions).await
    }

    /// Fails with a conflict while pronostics still use the competition.
    #[instrument(skip(self))]
    pub async fn delete_competition(&self, id: i32) -> ApiResult<()> {
        let competition = self
            .competitions
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Competition", id))?;
        let pronostics = self.pronostics.count_by_competition(id).await?;
        if pronostics > 0 {
            warn!(pronostics, "Competition {} is still referenced", id);
            return Err(ApiError::Conflict(format!(
                "Competition {} is still used by {pronostics} pronostics",
                competition.name
            )));
        }
        if !self.competitions.delete(id).await? {
            return Err(ApiError::not_found("Competition", id));
        }
        info!("Deleted competition {}", id);
        Ok(())
    }

    /// Attaches sports with a single lookup.
    async fn competition_views(
        &self,
        competitions: Vec<competition::Model>,
    ) -> ApiResult<Vec<CompetitionView>> {
        let sports = self.sports_by_id(competitions.iter().map(|c| c.sport_id)).await?;
        competitions
            .into_iter()
            .map(|competition| {
                let sport = sports.get(&competition.sport_id).cloned().ok_or_else(|| {
                    ApiError::Internal(format!(
                        "competition {} references missing sport {}",
                        competition.id, competition.sport_id
                    ))
                })?;
                Ok(CompetitionView { competition, sport })
            })
            .collect()
    }

    pub(super) async fn sports_by_id(
        &self,
        ids: impl Iterator<Item = i32>,
    ) -> ApiResult<HashMap<i32, sport::Model>> {
        let mut ids: Vec<i32> = ids.collect();
        ids.sort_unstable();
        ids.dedup();
        let sports = self.sports.find_by_ids(&ids).await?;
        debug!("Loaded {} sports", sports.len());
        Ok(sports.into_iter().map(|s| (s.id, s)).collect())
    }

    pub(super) async fn competitions_by_id(
        &self,
        ids: impl Iterator<Item = i32>,
    ) -> ApiResult<HashMap<i32, competition::Model>> {
        let mut ids: Vec<i32> = ids.collect();
        ids.sort_unstable();
        ids.dedup();
        let competitions = self.competitions.find_by_ids(&ids).await?;
        debug!("Loaded {} competitions", competitions.len());
        Ok(competitions.into_iter().map(|c| (c.id, c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_app_state;
    use chrono::{TimeZone, Utc};

    fn season(sport_id: i32) -> NewCompetition {
        NewCompetition {
            sport_id,
            name: "Ligue 1".to_string(),
            start_at: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
            end_at: Utc.with_ymd_and_hms(2027, 5, 31, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_blank_sport_name_is_rejected() {
        let service = setup_test_app_state().await.service;

        let result = service.create_sport("   ").await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(service.list_sports().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_referenced_sport_cannot_be_deleted() {
        let service = setup_test_app_state().await.service;
        let sport = service.create_sport("Football").await.unwrap();
        let view = service.create_competition(season(sport.id)).await.unwrap();

        let result = service.delete_sport(sport.id).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert!(service.get_sport(sport.id).await.is_ok());

        service.delete_competition(view.competition.id).await.unwrap();
        service.delete_sport(sport.id).await.unwrap();
        assert!(matches!(
            service.delete_sport(sport.id).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
