//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::layout::Layout;

// =============================================================================
// Static content
// =============================================================================

/// A service family shown on the home page.
#[derive(Clone)]
pub struct ServiceHighlight {
    pub title: &'static str,
    pub description: &'static str,
    pub providers: &'static str,
    /// Search term the card links to on the services page.
    pub search: &'static str,
}

/// A platform feature.
#[derive(Clone)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

/// A headline figure in the hero.
#[derive(Clone)]
pub struct Stat {
    pub value: &'static str,
    pub label: &'static str,
}

/// A customer or provider testimonial.
#[derive(Clone)]
pub struct Testimonial {
    pub name: &'static str,
    pub role: &'static str,
    pub content: &'static str,
    pub rating: u8,
}

impl Testimonial {
    /// Star string for the rating.
    #[must_use]
    pub fn stars(&self) -> String {
        "★".repeat(usize::from(self.rating))
    }
}

const SERVICES: [ServiceHighlight; 4] = [
    ServiceHighlight {
        title: "Home Cooking",
        description: "Authentic home-cooked meals and catering services",
        providers: "150+ Cooks",
        search: "cooking",
    },
    ServiceHighlight {
        title: "Beauty Services",
        description: "Hair styling, makeup, and beauty treatments at home",
        providers: "80+ Beauticians",
        search: "beauty",
    },
    ServiceHighlight {
        title: "Tutoring",
        description: "Academic support and skill development classes",
        providers: "200+ Tutors",
        search: "tutoring",
    },
    ServiceHighlight {
        title: "Tailoring",
        description: "Custom clothing, alterations, and embroidery work",
        providers: "120+ Tailors",
        search: "tailoring",
    },
];

const FEATURES: [Feature; 4] = [
    Feature {
        title: "Verified Profiles",
        description: "All service providers are background-checked and verified for your safety",
    },
    Feature {
        title: "WhatsApp Integration",
        description: "Easy communication and booking through WhatsApp for convenience",
    },
    Feature {
        title: "Trusted Reviews",
        description: "Real reviews from verified customers to help you make informed decisions",
    },
    Feature {
        title: "Quality Assurance",
        description: "Regular quality checks and customer feedback monitoring",
    },
];

const STATS: [Stat; 4] = [
    Stat { value: "500+", label: "Verified Providers" },
    Stat { value: "2000+", label: "Happy Customers" },
    Stat { value: "15+", label: "Cities Covered" },
    Stat { value: "4.8★", label: "Average Rating" },
];

const STEPS: [Feature; 3] = [
    Feature {
        title: "Browse & Select",
        description: "Search verified providers by service, location and rating",
    },
    Feature {
        title: "Connect via WhatsApp",
        description: "Chat directly with the provider to agree on details and timing",
    },
    Feature {
        title: "Enjoy Service",
        description: "Get quality service at home, then leave a review for the community",
    },
];

const TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        name: "Priya Sharma",
        role: "Working Mother",
        content: "GharKaKaam helped me find an amazing cook who prepares healthy meals for my family. The verification process gave me complete peace of mind.",
        rating: 5,
    },
    Testimonial {
        name: "Sunita Devi",
        role: "Service Provider",
        content: "As a beautician, this platform helped me reach more clients safely. The support team is very helpful and the payment system is reliable.",
        rating: 5,
    },
    Testimonial {
        name: "Meera Patel",
        role: "Homemaker",
        content: "Found an excellent tutor for my daughter through GharKaKaam. The reviews and ratings system made it easy to choose the right person.",
        rating: 5,
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub services: &'static [ServiceHighlight],
    pub features: &'static [Feature],
    pub stats: &'static [Stat],
    pub steps: &'static [Feature],
    pub testimonials: &'static [Testimonial],
}

/// Display the home page.
#[instrument(skip(layout))]
pub async fn home(layout: Layout) -> impl IntoResponse {
    HomeTemplate {
        layout,
        services: &SERVICES,
        features: &FEATURES,
        stats: &STATS,
        steps: &STEPS,
        testimonials: &TESTIMONIALS,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_home_renders_static_sections() {
        let html = HomeTemplate {
            layout: Layout::default(),
            services: &SERVICES,
            features: &FEATURES,
            stats: &STATS,
            steps: &STEPS,
            testimonials: &TESTIMONIALS,
        }
        .render()
        .unwrap();

        assert!(html.contains("Building Communities"));
        assert!(html.contains("/services?search=tutoring"));
        assert!(html.contains("Meera Patel"));
        assert!(html.contains("★★★★★"));
    }
}
