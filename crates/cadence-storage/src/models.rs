use crate::schema::documents;

use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentRow {
  pub collection: String,
  pub id: String,
  pub body: String,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
pub struct NewDocumentRow {
  pub collection: String,
  pub id: String,
  pub body: String,
  pub created_at: String,
  pub updated_at: String,
}
