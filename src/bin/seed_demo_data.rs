// ABOUTME: Demo data seeding utility for the GOYA server
// ABOUTME: Creates careers, cohorts, people, and blog posts through the regular managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

//! # Demo Data Seeder
//!
//! Populates a database with a small, coherent data set for local development.
//! Re-running is safe: records that already exist are reported and skipped.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin seed-demo-data
//! cargo run --bin seed-demo-data -- --database-url sqlite:./data/goya.db
//! cargo run --bin seed-demo-data -- -v
//! ```

use std::env;

use chrono::{Duration, Utc};
use clap::Parser;
use goya_server::config::environment::DEFAULT_DATABASE_URL;
use goya_server::database::{
    BlogSort, CreateBlogPostRequest, CreateCareerRequest, CreateCoachRequest,
    CreateCohortRequest, CreateStudentRequest, CreateUserRequest, Database, Page,
};
use goya_server::errors::{AppError, ErrorCode};
use goya_server::models::{Career, UserRole};
use thiserror::Error;
use tracing::{info, warn};

/// CLI-specific error type for the seed binary
#[derive(Error, Debug)]
enum SeedError {
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

type SeedResult<T> = Result<T, SeedError>;

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "GOYA demo data seeder",
    long_about = "Create demo careers, cohorts, coaches, and students for local development"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Seats per demo cohort
    #[arg(long, default_value_t = 20)]
    cohort_capacity: i64,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Seeding result statistics
#[derive(Default)]
struct SeedStats {
    created: u32,
    skipped: u32,
}

impl SeedStats {
    /// Record an outcome; conflicts mean the record is already there
    fn record<T>(&mut self, label: &str, result: Result<T, AppError>) -> SeedResult<Option<T>> {
        match result {
            Ok(value) => {
                info!("  + {label}");
                self.created += 1;
                Ok(Some(value))
            }
            Err(e) if e.code == ErrorCode::ResourceConflict => {
                info!("  = {label} (already present)");
                self.skipped += 1;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

const CAREERS: &[(&str, &str)] = &[
    ("Software Engineering", "Full-stack web development from fundamentals to deployment"),
    ("Data Analytics", "Spreadsheets, SQL, and dashboards for decision making"),
    ("Product Design", "User research, prototyping, and interface design"),
];

const COACHES: &[(&str, &str, &str)] = &[
    ("amina.okafor@goya.africa", "Amina", "Okafor"),
    ("kwame.mensah@goya.africa", "Kwame", "Mensah"),
    ("lindiwe.dlamini@goya.africa", "Lindiwe", "Dlamini"),
];

const STUDENTS: &[(&str, &str, &str)] = &[
    ("tunde.adeyemi@example.com", "Tunde", "Adeyemi"),
    ("fatou.diallo@example.com", "Fatou", "Diallo"),
    ("wanjiru.kamau@example.com", "Wanjiru", "Kamau"),
    ("youssef.benali@example.com", "Youssef", "Benali"),
];

const BLOG_POSTS: &[(&str, &str, &str)] = &[
    (
        "Landing your first tech role",
        "How GOYA alumni turned portfolio projects into interviews.",
        "Amina Okafor",
    ),
    (
        "What a mentor session looks like",
        "A walkthrough of the weekly check-in format our coaches use.",
        "Kwame Mensah",
    ),
];

#[tokio::main]
async fn main() -> SeedResult<()> {
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== GOYA Demo Data Seeder ===");

    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
    info!("Connecting to database: {}", database_url);
    let database = Database::new(&database_url, 1).await?;

    let mut stats = SeedStats::default();

    info!("=== Careers and cohorts ===");
    let careers = seed_careers(&database, &mut stats, args.cohort_capacity).await?;

    info!("=== Coaches ===");
    for (index, (email, first, last)) in COACHES.iter().enumerate() {
        let user = stats.record(
            email,
            database
                .users()
                .create(&CreateUserRequest {
                    email: (*email).to_owned(),
                    first_name: (*first).to_owned(),
                    last_name: (*last).to_owned(),
                    role: UserRole::Coach,
                    approved: true,
                })
                .await,
        )?;
        let Some(user) = user else { continue };
        let career_id = careers.get(index % careers.len().max(1)).map(|c| c.id);
        stats.record(
            &format!("coach profile for {email}"),
            database
                .coaches()
                .create(&CreateCoachRequest {
                    user_id: user.id,
                    career_id,
                    bio: Some(format!("{first} mentors GOYA students.")),
                })
                .await,
        )?;
    }

    info!("=== Students ===");
    for (email, first, last) in STUDENTS {
        let user = stats.record(
            email,
            database
                .users()
                .create(&CreateUserRequest {
                    email: (*email).to_owned(),
                    first_name: (*first).to_owned(),
                    last_name: (*last).to_owned(),
                    role: UserRole::Student,
                    approved: true,
                })
                .await,
        )?;
        if let Some(user) = user {
            stats.record(
                &format!("student record for {email}"),
                database
                    .students()
                    .create(&CreateStudentRequest { user_id: user.id })
                    .await,
            )?;
        }
    }

    info!("=== Blog ===");
    seed_blog(&database, &mut stats).await?;

    database.close().await;

    info!("");
    info!("=== Summary ===");
    info!("Created: {}", stats.created);
    info!("Skipped: {}", stats.skipped);
    Ok(())
}

/// Create careers with one upcoming and one later cohort each
async fn seed_careers(
    database: &Database,
    stats: &mut SeedStats,
    capacity: i64,
) -> SeedResult<Vec<Career>> {
    let mut careers = Vec::new();
    let now = Utc::now();

    for (offset, (title, description)) in (0_i64..).zip(CAREERS.iter()) {
        let created = stats.record(
            title,
            database
                .careers()
                .create(&CreateCareerRequest {
                    title: (*title).to_owned(),
                    description: Some((*description).to_owned()),
                })
                .await,
        )?;
        let Some(career) = created else {
            warn!("  skipping cohorts for existing career '{title}'");
            continue;
        };

        for (wave, weeks_out) in [(1, 2 + offset), (2, 14 + offset)] {
            let start_date = now + Duration::weeks(weeks_out);
            stats.record(
                &format!("{title} cohort {wave}"),
                database
                    .cohorts()
                    .create(&CreateCohortRequest {
                        name: format!("{title} {} #{wave}", start_date.format("%Y-%m")),
                        career_id: career.id,
                        start_date,
                        end_date: start_date + Duration::weeks(12),
                        capacity,
                        status: None,
                    })
                    .await,
            )?;
        }
        careers.push(career);
    }

    Ok(careers)
}

/// Publish the demo articles into an empty blog
async fn seed_blog(database: &Database, stats: &mut SeedStats) -> SeedResult<()> {
    let blog = database.blog();
    if !blog.list(BlogSort::Oldest, Page::default()).await?.is_empty() {
        info!("  = blog already has posts");
        stats.skipped += 1;
        return Ok(());
    }

    for (title, description, writer) in BLOG_POSTS {
        stats.record(
            title,
            blog.create(&CreateBlogPostRequest {
                title: (*title).to_owned(),
                description: (*description).to_owned(),
                writer: (*writer).to_owned(),
                image: None,
            })
            .await,
        )?;
    }
    Ok(())
}
