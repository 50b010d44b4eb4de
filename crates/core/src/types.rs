/// Book ids are positive integers assigned by the server.
pub type BookId = i64;
