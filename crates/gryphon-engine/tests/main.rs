mod errors;
mod execution;
mod executors;
mod subscriptions;
