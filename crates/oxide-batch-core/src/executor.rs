//! The execution seam.
//!
//! The compiler never talks to a database. [`Executor`] is the collaborator
//! that receives the compiled SQL; its result and its errors are handed back
//! to the caller untouched.

/// Runs a compiled statement.
pub trait Executor {
    /// What a successful execution reports, typically an affected-row count.
    type Output;

    /// Error type of the underlying connection.
    type Error;

    /// Executes one SQL statement.
    ///
    /// # Errors
    ///
    /// Whatever the underlying connection reports.
    fn execute(&mut self, sql: &str) -> Result<Self::Output, Self::Error>;
}

impl<F, T, E> Executor for F
where
    F: FnMut(&str) -> Result<T, E>,
{
    type Output = T;
    type Error = E;

    fn execute(&mut self, sql: &str) -> Result<T, E> {
        self(sql)
    }
}
