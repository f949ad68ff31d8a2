//! Base repository traits shared by every store.
//!
//! A store only says which connection it runs on ([`Connected`]); the
//! read, write and delete traits then supply the generic CRUD queries for
//! any entity keyed by an `i32` id. The connection may be the pool or an
//! open transaction, so the same store code serves both.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func, IntoColumnRef, SimpleExpr},
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, QuerySelect, Select,
};

use crate::errors::AppResult;
use crate::types::PaginationParams;

/// Gives a store its connection.
pub trait Connected: Send + Sync {
    type Conn: ConnectionTrait + Send + Sync;

    fn db(&self) -> &Self::Conn;
}

/// Read operations
#[async_trait]
pub trait ReadRepository<E>: Connected
where
    E: EntityTrait,
    E::Model: Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
{
    /// Find a row by primary key
    async fn find_model(&self, id: i32) -> AppResult<Option<E::Model>> {
        Ok(E::find_by_id(id).one(self.db()).await?)
    }

    /// Fetch one page of an already filtered and ordered query
    async fn fetch_page(
        &self,
        select: Select<E>,
        page: &PaginationParams,
    ) -> AppResult<Vec<E::Model>> {
        Ok(select
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db())
            .await?)
    }
}

/// Write operations
#[async_trait]
pub trait WriteRepository<A>: Connected
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A> + Send + Sync,
{
    async fn insert_model(&self, model: A) -> AppResult<<A::Entity as EntityTrait>::Model> {
        Ok(model.insert(self.db()).await?)
    }

    async fn update_model(&self, model: A) -> AppResult<<A::Entity as EntityTrait>::Model> {
        Ok(model.update(self.db()).await?)
    }
}

/// Delete operations
#[async_trait]
pub trait DeleteRepository<E>: Connected
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
{
    /// Delete by primary key; false when no row matched
    async fn delete_model(&self, id: i32) -> AppResult<bool> {
        let result = E::delete_by_id(id).exec(self.db()).await?;
        Ok(result.rows_affected > 0)
    }
}

/// `lower(col) LIKE '%term%'`, with LIKE wildcards in `term` matched literally.
pub fn contains_ci(col: impl IntoColumnRef, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(col))).like(pattern)
}

/// `lower(col) = lower(value)`
pub fn equals_ci(col: impl IntoColumnRef, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).eq(value.to_lowercase())
}

/// Escape `%`, `_` and the escape character itself (PostgreSQL's default `\`).
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Non-blank filter value, trimmed.
pub fn filter_term(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn blank_filters_are_ignored() {
        assert_eq!(filter_term(&Some("  spa ".into())), Some("spa"));
        assert_eq!(filter_term(&Some("   ".into())), None);
        assert_eq!(filter_term(&None), None);
    }
}
