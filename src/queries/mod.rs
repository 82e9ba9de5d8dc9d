//! SQL builders for the document table, one function per statement.
//! Functions ending in `_pg` render PostgreSQL syntax.

pub mod ddl;
pub mod documents;
