//! Command-line client for the six cities listings service.
//!
//! Each subcommand boots the state container, runs one operation and prints
//! the resulting state.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use six_cities::guard::{offer_page, OfferPage};
use six_cities::selectors::{self, OffersByCity};
use six_cities::types::{FavoriteStatus, Offer, OfferId, SortOption, CITIES};
use six_cities::{Config, SixCities};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "six-cities")]
#[command(about = "Browse and bookmark rental offers in six cities", long_about = None)]
struct Cli {
    /// Listings service base URL (overrides SIX_CITIES_API_URL)
    #[arg(long, env = "SIX_CITIES_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List offers in a city
    Offers {
        /// City to list
        #[arg(short, long, default_value = six_cities::types::DEFAULT_CITY)]
        city: String,

        /// Sort order (popular, price-asc, price-desc, top-rated)
        #[arg(short, long, default_value = "popular")]
        sort: SortOption,
    },
    /// Show one offer with its reviews and nearby offers
    Offer {
        /// Offer id
        id: String,
    },
    /// List bookmarked offers
    Favorites,
    /// Sign in and store the session token
    Login {
        /// Account email
        email: String,
        /// Password with at least one letter and one digit
        password: String,
    },
    /// Sign out and drop the session token
    Logout,
    /// Add or remove a bookmark
    Favorite {
        /// Offer id
        id: String,
        /// on or off
        status: FavoriteStatus,
    },
    /// Post a review
    Review {
        /// Offer id
        id: String,
        /// Stars, 1 to 5
        rating: u8,
        /// Review text, 50 to 300 characters
        comment: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "six_cities=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let app = SixCities::from_config(&config).context("failed to build client")?;
    app.check_auth().await;
    info!(
        status = %app.select(selectors::authorization_status).await,
        "Session checked"
    );

    let outcome = run(&app, cli.command).await;
    app.shutdown().await?;
    outcome
}

async fn run(app: &SixCities, command: Command) -> Result<()> {
    match command {
        Command::Offers { city, sort } => {
            if !CITIES.contains(&city.as_str()) {
                bail!("unknown city {city}, expected one of {}", CITIES.join(", "));
            }

            app.change_city(city.as_str()).await?;
            app.fetch_offers().await?;

            let state = app.snapshot().await;
            let in_city = OffersByCity::new().select(&state);
            println!("{} places to stay in {city} ({sort})", in_city.len());
            for offer in selectors::sort_offers(&in_city, sort) {
                print_offer(&offer);
            }
        },
        Command::Offer { id } => {
            let id = OfferId::new(id);
            app.open_offer(&id).await?;

            let state = app.snapshot().await;
            match offer_page(&state, &id) {
                OfferPage::Ready(offer) => {
                    print_offer(&offer);
                    if !offer.description.is_empty() {
                        println!("\n{}", offer.description);
                    }

                    println!("\nReviews ({})", selectors::review_count(&state));
                    for review in selectors::latest_reviews(&state) {
                        println!(
                            "  {} {:.1} {}\n    {}",
                            review.date.format("%B %Y"),
                            review.rating,
                            review.user.name,
                            review.comment
                        );
                    }

                    println!("\nOther places in the neighbourhood");
                    for nearby in selectors::nearby_for_map(&state).iter().skip(1) {
                        print_offer(nearby);
                    }
                },
                OfferPage::NotFound | OfferPage::Empty => bail!("offer {id} not found"),
                OfferPage::Loading => bail!("offer {id} is still loading"),
            }
        },
        Command::Favorites => {
            app.fetch_favorites().await?;

            let state = app.snapshot().await;
            let groups = selectors::favorites_by_city(&state);
            if groups.is_empty() {
                println!("Nothing yet saved");
            }
            for (city, offers) in groups {
                println!("{city}");
                for offer in offers {
                    print_offer(&offer);
                }
            }
        },
        Command::Login { email, password } => {
            app.login(&email, &password).await?;
            println!("Signed in as {email}");
        },
        Command::Logout => {
            app.logout().await?;
            println!("Signed out");
        },
        Command::Favorite { id, status } => {
            app.toggle_favorite(&OfferId::new(id.as_str()), status)
                .await?;
            println!("Bookmark {id}: {status:?}");
        },
        Command::Review {
            id,
            rating,
            comment,
        } => {
            app.post_comment(&OfferId::new(id.as_str()), rating, &comment)
                .await?;
            println!("Review posted for {id}");
        },
    }
    Ok(())
}

fn print_offer(offer: &Offer) {
    let mut badges = String::new();
    if offer.is_premium {
        badges.push_str(" [premium]");
    }
    if offer.is_favorite {
        badges.push_str(" [bookmarked]");
    }

    println!(
        "  {:>6}  €{:<5} {:.1}★  {}{badges}",
        offer.id.as_str(),
        offer.price,
        offer.rating,
        offer.title
    );
}
