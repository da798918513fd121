mod accounting;
mod portfolio;
mod snapshot;
