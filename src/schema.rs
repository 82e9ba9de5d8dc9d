use sea_query::Iden;

/// Documents table - JSON records grouped by collection name
#[derive(Iden)]
pub enum Documents {
    Table,
    Id,
    Collection,
    Body,
    CreatedAt,
}
