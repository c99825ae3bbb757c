use crate::Executor;
use std::sync::Arc;

pub(crate) use hummingbird_rs_internal::Request;

/// Helper trait for [`crate::Hummingbird`] request generic returns.
/// Must be implemented for every struct which is returned by a request. Structs which can make
/// follow-up requests themselves (like [`crate::user::User::library`]) store the executor they
/// were requested with.
#[doc(hidden)]
pub trait Request {
    /// Set a usable [`Executor`] instance to the struct if required
    fn __set_executor(&mut self, _: Arc<Executor>) {}
}

/// Authentication tokens are returned as bare json string.
impl Request for String {}

/// Removing a library entry returns a bare json boolean.
impl Request for bool {}

impl<T: Request> Request for Vec<T> {
    fn __set_executor(&mut self, executor: Arc<Executor>) {
        for item in self.iter_mut() {
            item.__set_executor(executor.clone())
        }
    }
}
