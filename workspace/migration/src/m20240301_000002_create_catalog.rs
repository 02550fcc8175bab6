use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::{competition, pronostic, sport, ticket};
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Sports
        manager
            .create_table(
                Table::create()
                    .table(Sport::table())
                    .if_not_exists()
                    .col(pk_auto(Sport::column(sport::Column::Id)))
                    .col(string(Sport::column(sport::Column::Name)).unique_key())
                    .col(timestamp_with_time_zone(Sport::column(sport::Column::CreatedAt)))
                    .col(timestamp_with_time_zone(Sport::column(sport::Column::UpdatedAt)))
                    .to_owned(),
            )
            .await?;

        // Competitions, each within one sport
        manager
            .create_table(
                Table::create()
                    .table(Competition::table())
                    .if_not_exists()
                    .col(pk_auto(Competition::column(competition::Column::Id)))
                    .col(integer(Competition::column(competition::Column::SportId)))
                    .col(string(Competition::column(competition::Column::Name)))
                    .col(timestamp_with_time_zone(Competition::column(competition::Column::StartAt)))
                    .col(timestamp_with_time_zone(Competition::column(competition::Column::EndAt)))
                    .col(timestamp_with_time_zone(Competition::column(competition::Column::CreatedAt)))
                    .col(timestamp_with_time_zone(Competition::column(competition::Column::UpdatedAt)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_competition_sport")
                            .from(Competition::table(), Competition::column(competition::Column::SportId))
                            .to(Sport::table(), Sport::column(sport::Column::Id))
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Tickets
        manager
            .create_table(
                Table::create()
                    .table(Ticket::table())
                    .if_not_exists()
                    .col(pk_auto(Ticket::column(ticket::Column::Id)))
                    .col(string(Ticket::column(ticket::Column::Title)))
                    .col(decimal(Ticket::column(ticket::Column::Stake)).decimal_len(16, 4))
                    .col(boolean(Ticket::column(ticket::Column::Public)).default(false))
                    .col(boolean(Ticket::column(ticket::Column::Live)).default(false))
                    .col(string(Ticket::column(ticket::Column::Risk)))
                    .col(string_null(Ticket::column(ticket::Column::Pack)))
                    .col(timestamp_with_time_zone(Ticket::column(ticket::Column::CreatedAt)))
                    .col(timestamp_with_time_zone(Ticket::column(ticket::Column::UpdatedAt)))
                    .to_owned(),
            )
            .await?;

        // Pronostics: cascade with their ticket, pin the referenced sport and competition
        manager
            .create_table(
                Table::create()
                    .table(Pronostic::table())
                    .if_not_exists()
                    .col(pk_auto(Pronostic::column(pronostic::Column::Id)))
                    .col(integer(Pronostic::column(pronostic::Column::TicketId)))
                    .col(integer(Pronostic::column(pronostic::Column::SportId)))
                    .col(integer(Pronostic::column(pronostic::Column::CompetitionId)))
                    .col(string(Pronostic::column(pronostic::Column::FirstTeam)))
                    .col(string(Pronostic::column(pronostic::Column::SecondTeam)))
                    .col(string(Pronostic::column(pronostic::Column::Pronostic)))
                    .col(decimal(Pronostic::column(pronostic::Column::Odd)).decimal_len(16, 4))
                    .col(string_len(Pronostic::column(pronostic::Column::Status), 16))
                    .col(timestamp_with_time_zone(Pronostic::column(pronostic::Column::EventDate)))
                    .col(timestamp_with_time_zone(Pronostic::column(pronostic::Column::CreatedAt)))
                    .col(timestamp_with_time_zone(Pronostic::column(pronostic::Column::UpdatedAt)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pronostic_ticket")
                            .from(Pronostic::table(), Pronostic::column(pronostic::Column::TicketId))
                            .to(Ticket::table(), Ticket::column(ticket::Column::Id))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pronostic_sport")
                            .from(Pronostic::table(), Pronostic::column(pronostic::Column::SportId))
                            .to(Sport::table(), Sport::column(sport::Column::Id))
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pronostic_competition")
                            .from(Pronostic::table(), Pronostic::column(pronostic::Column::CompetitionId))
                            .to(Competition::table(), Competition::column(competition::Column::Id))
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pronostic_ticket")
                    .table(Pronostic::table())
                    .col(Pronostic::column(pronostic::Column::TicketId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ticket_pack")
                    .table(Ticket::table())
                    .col(Ticket::column(ticket::Column::Pack))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [Pronostic::table(), Ticket::table(), Competition::table(), Sport::table()] {
            manager.drop_table(Table::drop().table(table).to_owned()).await?;
        }
        Ok(())
    }
}
