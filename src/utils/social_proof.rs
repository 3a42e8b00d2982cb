use rand::seq::SliceRandom;
use rand::Rng;

use crate::utils::geolocation::PoolVisitor;

pub const NAMES: [&str; 25] = [
    "Ana Paula",
    "Carlos Eduardo",
    "Fernanda",
    "Rafael",
    "Juliana",
    "Marcelo",
    "Patrícia",
    "Ricardo",
    "Camila",
    "Bruno",
    "Larissa",
    "Thiago",
    "Mariana",
    "Gustavo",
    "Beatriz",
    "Rodrigo",
    "Aline",
    "Felipe",
    "Vanessa",
    "Leonardo",
    "Priscila",
    "André",
    "Gabriela",
    "Daniel",
    "Renata",
];

pub const TIME_LABELS: [&str; 5] = [
    "há alguns segundos",
    "há 1 minuto",
    "há 2 minutos",
    "há 3 minutos",
    "agora mesmo",
];

pub const FALLBACK_CITY: &str = "São Paulo, SP";
pub const JUST_NOW: &str = "agora mesmo";

/// Milliseconds before the first notification.
pub const INITIAL_DELAY_MS: (u32, u32) = (8_000, 12_000);
/// Milliseconds between notifications.
pub const INTERVAL_MS: (u32, u32) = (45_000, 75_000);
pub const DISPLAY_MS: u32 = 8_000;

const POOL_PROBABILITY: f64 = 0.7;

#[derive(Clone, Debug, PartialEq)]
pub struct SignupNotice {
    pub name: String,
    pub location: String,
    pub time_label: String,
}

fn random_name<R: Rng>(rng: &mut R) -> &'static str {
    NAMES.choose(rng).copied().unwrap_or(NAMES[0])
}

/// Picks the next fake signup: usually a real pool entry when there is one,
/// otherwise a listed name placed in the visitor's own city.
pub fn pick_notification<R: Rng>(
    pool: &[PoolVisitor],
    visitor_city: Option<&str>,
    rng: &mut R,
) -> SignupNotice {
    let from_pool = if !pool.is_empty() && rng.gen_bool(POOL_PROBABILITY) {
        pool.choose(rng)
    } else {
        None
    };

    let (name, location) = match from_pool {
        Some(visitor) => {
            let name = if visitor.name == "Visitante" {
                random_name(rng).to_string()
            } else {
                visitor.name.clone()
            };
            (name, visitor.location.clone())
        }
        None => (
            random_name(rng).to_string(),
            visitor_city.unwrap_or(FALLBACK_CITY).to_string(),
        ),
    };

    SignupNotice {
        name,
        location,
        time_label: TIME_LABELS.choose(rng).copied().unwrap_or(JUST_NOW).to_string(),
    }
}

/// Notice for a signup that just happened on this page.
pub fn live_notification(name: &str, location: Option<&str>) -> SignupNotice {
    SignupNotice {
        name: name.to_string(),
        location: location.unwrap_or(FALLBACK_CITY).to_string(),
        time_label: JUST_NOW.to_string(),
    }
}

pub fn random_delay<R: Rng>(range: (u32, u32), rng: &mut R) -> u32 {
    rng.gen_range(range.0..=range.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn visitor(name: &str) -> PoolVisitor {
        PoolVisitor {
            name: name.into(),
            location: "Recife, PE".into(),
            timestamp: 0,
        }
    }

    #[test]
    fn empty_pool_uses_the_visitor_city() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let notice = pick_notification(&[], Some("Curitiba, PR"), &mut rng);
            assert_eq!(notice.location, "Curitiba, PR");
            assert!(NAMES.contains(&notice.name.as_str()));
            assert!(TIME_LABELS.contains(&notice.time_label.as_str()));
        }
        let notice = pick_notification(&[], None, &mut rng);
        assert_eq!(notice.location, FALLBACK_CITY);
    }

    #[test]
    fn pool_is_used_most_of_the_time() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = vec![visitor("Joana")];
        let from_pool = (0..1000)
            .filter(|_| pick_notification(&pool, Some("Curitiba, PR"), &mut rng).location == "Recife, PE")
            .count();
        assert!((600..=800).contains(&from_pool), "{}", from_pool);
    }

    #[test]
    fn placeholder_names_are_replaced() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = vec![visitor("Visitante")];
        for _ in 0..100 {
            let notice = pick_notification(&pool, None, &mut rng);
            assert_ne!(notice.name, "Visitante");
        }
    }

    #[test]
    fn delays_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let initial = random_delay(INITIAL_DELAY_MS, &mut rng);
            assert!((8_000..=12_000).contains(&initial));
            let next = random_delay(INTERVAL_MS, &mut rng);
            assert!((45_000..=75_000).contains(&next));
        }
    }

    #[test]
    fn live_signups_are_just_now() {
        let notice = live_notification("Paulo", None);
        assert_eq!(notice.time_label, "agora mesmo");
        assert_eq!(notice.location, FALLBACK_CITY);
    }
}
