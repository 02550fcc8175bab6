use model::entities::prelude::*;
use sea_orm::entity::prelude::*;
use sea_orm::Iden;

/// Lets migrations name tables and columns through the model entities
/// instead of repeating string identifiers.
pub trait EntityIden: EntityTrait {
    fn table() -> TableIden {
        TableIden(Self::default().table_name().to_string())
    }

    fn column<C: ColumnTrait + Iden>(column: C) -> ColumnIden {
        let mut s = String::new();
        column.unquoted(&mut s);
        ColumnIden(s)
    }
}

impl EntityIden for Sport {}
impl EntityIden for Competition {}
impl EntityIden for Ticket {}
impl EntityIden for Pronostic {}

#[derive(Debug, Clone)]
pub struct TableIden(String);

impl Iden for TableIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = s.write_str(&self.0);
    }
}

#[derive(Debug, Clone)]
pub struct ColumnIden(String);

impl Iden for ColumnIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = s.write_str(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entities::pronostic;

    #[test]
    fn test_identifiers_follow_entity_names() {
        assert_eq!(Pronostic::table().to_string(), "pronostics");
        assert_eq!(Pronostic::column(pronostic::Column::CompetitionId).to_string(), "competition_id");
    }
}
