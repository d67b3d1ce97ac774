pub mod catalog;
pub mod checkout;
pub mod notifier;
pub mod payment;
pub mod prompts;
pub mod reconciler;
pub mod store;

#[cfg(test)]
pub mod testutil;
