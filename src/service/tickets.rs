use std::collections::HashMap;

use model::entities::pronostic::{self, PronosticStatus};
use model::entities::ticket;
use tracing::{debug, info, instrument};

use super::{ApiService, PronosticView, TicketView};
use crate::error::{ApiError, ApiResult};
use crate::store::{NewPronostic, NewTicket, TicketChanges};

impl ApiService {
    #[instrument(skip(self))]
    pub async fn create_ticket(&self, new: NewTicket) -> ApiResult<TicketView> {
        let ticket = self.tickets.create(new).await?;
        info!("Created ticket {}", ticket.id);
        self.ticket_view(ticket).await
    }

    #[instrument(skip(self))]
    pub async fn get_ticket(&self, id: i32) -> ApiResult<TicketView> {
        let ticket = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Ticket", id))?;
        self.ticket_view(ticket).await
    }

    #[instrument(skip(self))]
    pub async fn list_tickets(&self, pack: Option<&str>) -> ApiResult<Vec<TicketView>> {
        let tickets = self.tickets.list(pack).await?;
        self.ticket_views(tickets).await
    }

    #[instrument(skip(self))]
    pub async fn update_ticket(&self, id: i32, changes: TicketChanges) -> ApiResult<TicketView> {
        let ticket = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Ticket", id))?;
        let ticket = self.tickets.update(ticket, changes).await?;
        info!("Updated ticket {}", ticket.id);
        self.ticket_view(ticket).await
    }

    /// Deletes the ticket together with its pronostics.
    #[instrument(skip(self))]
    pub async fn delete_ticket(&self, id: i32) -> ApiResult<()> {
        if !self.tickets.delete(id).await? {
            return Err(ApiError::not_found("Ticket", id));
        }
        info!("Deleted ticket {}", id);
        Ok(())
    }

    /// Adds a pronostic to a ticket. The competition must belong to the sport.
    #[instrument(skip(self))]
    pub async fn create_pronostic(&self, new: NewPronostic) -> ApiResult<PronosticView> {
        if self.tickets.find_by_id(new.ticket_id).await?.is_none() {
            return Err(ApiError::Validation(format!(
                "Ticket with ID {} does not exist",
                new.ticket_id
            )));
        }
        let sport = self.sports.find_by_id(new.sport_id).await?.ok_or_else(|| {
            ApiError::Validation(format!("Sport with ID {} does not exist", new.sport_id))
        })?;
        let competition = self
            .competitions
            .find_by_id(new.competition_id)
            .await?
            .ok_or_else(|| {
                ApiError::Validation(format!(
                    "Competition with ID {} does not exist",
                    new.competition_id
                ))
            })?;
        if competition.sport_id != sport.id {
            return Err(ApiError::Validation(format!(
                "Competition {} is not part of sport {}",
                competition.name, sport.name
            )));
        }

        let pronostic = self.pronostics.create(new).await?;
        info!("Created pronostic {} on ticket {}", pronostic.id, pronostic.ticket_id);
        Ok(PronosticView {
            pronostic,
            sport,
            competition,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_pronostic(&self, id: i32) -> ApiResult<PronosticView> {
        let pronostic = self
            .pronostics
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Pronostic", id))?;
        let mut views = self.pronostic_views(vec![pronostic]).await?;
        views.pop().ok_or_else(|| ApiError::not_found("Pronostic", id))
    }

    pub async fn list_pronostics(&self) -> ApiResult<Vec<PronosticView>> {
        let pronostics = self.pronostics.list().await?;
        self.pronostic_views(pronostics).await
    }

    /// Settles (or reopens) a pronostic. Only the status can change.
    #[instrument(skip(self))]
    pub async fn update_pronostic_status(
        &self,
        id: i32,
        status: PronosticStatus,
    ) -> ApiResult<PronosticView> {
        let pronostic = self
            .pronostics
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Pronostic", id))?;
        let pronostic = self.pronostics.update_status(pronostic, status).await?;
        info!("Pronostic {} is now {:?}", pronostic.id, status);
        let mut views = self.pronostic_views(vec![pronostic]).await?;
        views.pop().ok_or_else(|| ApiError::not_found("Pronostic", id))
    }

    #[instrument(skip(self))]
    pub async fn delete_pronostic(&self, id: i32) -> ApiResult<()> {
        if !self.pronostics.delete(id).await? {
            return Err(ApiError::not_found("Pronostic", id));
        }
        info!("Deleted pronostic {}", id);
        Ok(())
    }

    async fn ticket_view(&self, ticket: ticket::Model) -> ApiResult<TicketView> {
        let id = ticket.id;
        let mut views = self.ticket_views(vec![ticket]).await?;
        views.pop().ok_or_else(|| ApiError::not_found("Ticket", id))
    }

    /// Loads the pronostics of all tickets at once and derives each ticket's
    /// odd and status from them.
    async fn ticket_views(&self, tickets: Vec<ticket::Model>) -> ApiResult<Vec<TicketView>> {
        let ids: Vec<i32> = tickets.iter().map(|t| t.id).collect();
        let pronostics = self.pronostics.list_by_tickets(&ids).await?;

        let mut by_ticket: HashMap<i32, Vec<PronosticView>> = HashMap::new();
        for view in self.pronostic_views(pronostics).await? {
            by_ticket.entry(view.pronostic.ticket_id).or_default().push(view);
        }

        let mut views = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let pronostics = by_ticket.remove(&ticket.id).unwrap_or_default();
            let aggregate = compute::aggregate_legs(
                pronostics.iter().map(|v| (v.pronostic.status, v.pronostic.odd)),
            )?;
            debug!(ticket_id = ticket.id, odd = %aggregate.odd, "Derived ticket aggregate");
            views.push(TicketView {
                ticket,
                aggregate,
                pronostics,
            });
        }
        Ok(views)
    }

    async fn pronostic_views(
        &self,
        pronostics: Vec<pronostic::Model>,
    ) -> ApiResult<Vec<PronosticView>> {
        let sports = self.sports_by_id(pronostics.iter().map(|p| p.sport_id)).await?;
        let competitions = self
            .competitions_by_id(pronostics.iter().map(|p| p.competition_id))
            .await?;

        pronostics
            .into_iter()
            .map(|pronostic| {
                let sport = sports.get(&pronostic.sport_id).cloned();
                let competition = competitions.get(&pronostic.competition_id).cloned();
                match (sport, competition) {
                    (Some(sport), Some(competition)) => Ok(PronosticView {
                        pronostic,
                        sport,
                        competition,
                    }),
                    _ => Err(ApiError::Internal(format!(
                        "pronostic {} references a missing sport or competition",
                        pronostic.id
                    ))),
                }
            })
            .collect()
    }
}
