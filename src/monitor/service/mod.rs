mod tick;

pub use tick::check_health;

#[cfg(test)]
use tick::check_health_at;

#[cfg(test)]
mod tests;
