//! Builds `UPDATE ... SET` statements from the fields a patch actually carries.

use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// `UPDATE <table> SET col = $1, ... WHERE id = $n RETURNING <columns>`, one assignment per supplied field.
pub struct UpdateBuilder<'args> {
    qb: QueryBuilder<'args, Postgres>,
    assigned: usize,
}

impl<'args> UpdateBuilder<'args> {
    pub fn new(table: &str) -> Self {
        UpdateBuilder {
            qb: QueryBuilder::new(format!("UPDATE {} SET ", table)),
            assigned: 0,
        }
    }

    /// Assign `column = value`.
    pub fn set<T>(&mut self, column: &str, value: T) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if self.assigned > 0 {
            self.qb.push(", ");
        }
        self.qb.push(column).push(" = ").push_bind(value);
        self.assigned += 1;
        self
    }

    /// Assign only when the patch supplied the field.
    pub fn set_opt<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if let Some(v) = value {
            self.set(column, v);
        }
        self
    }

    /// Close the statement with the id filter and the returned column list.
    pub fn finish(mut self, id: i32, returning: &str) -> QueryBuilder<'args, Postgres> {
        self.qb
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(returning);
        self.qb
    }
}
