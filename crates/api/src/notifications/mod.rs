pub mod notifier;

pub use notifier::FoundLinksNotifier;
