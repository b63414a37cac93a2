//! Demo data seeding
//!
//! Wipes every collection and loads a fixed demo data set whose relations
//! (post owners, group admins and members, request endpoints) are drawn at
//! random from the created users.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rand::Rng;

use crate::application::services::auth_service::hash_password;
use crate::domain::{
    FriendshipRequest, FriendshipStatus, Gender, Group, Post, Repositories, User,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

struct DemoUser {
    email: &'static str,
    password: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    birthday: (i32, u32, u32),
    gender: Gender,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        email: "admin@gmail.com",
        password: "Admin123!",
        first_name: "Admin",
        last_name: "Root",
        birthday: (1985, 3, 14),
        gender: Gender::Custom,
    },
    DemoUser {
        email: "lucia.martin@example.com",
        password: "Lucia2024!",
        first_name: "Lucia",
        last_name: "Martin",
        birthday: (1994, 7, 2),
        gender: Gender::Female,
    },
    DemoUser {
        email: "david.ruiz@example.com",
        password: "DavidR99$",
        first_name: "David",
        last_name: "Ruiz",
        birthday: (1999, 11, 23),
        gender: Gender::Male,
    },
    DemoUser {
        email: "sara.gomez@example.com",
        password: "SaraG00d&",
        first_name: "Sara",
        last_name: "Gomez",
        birthday: (2001, 1, 9),
        gender: Gender::Female,
    },
    DemoUser {
        email: "alex.moreno@example.com",
        password: "AlexM0re?",
        first_name: "Alex",
        last_name: "Moreno",
        birthday: (1990, 5, 30),
        gender: Gender::Custom,
    },
    DemoUser {
        email: "pablo.diaz@example.com",
        password: "PabloD1az*",
        first_name: "Pablo",
        last_name: "Diaz",
        birthday: (1988, 9, 17),
        gender: Gender::Male,
    },
];

const DEMO_POSTS: &[(&str, &[&str])] = &[
    ("First day at the new job, wish me luck", &["/public/img/office.jpg"]),
    ("Sunset from the rooftop tonight", &["/public/img/sunset.jpg"]),
    ("Does anyone have a good paella recipe?", &[]),
    ("Finished my first half marathon!", &["/public/img/race.jpg", "/public/img/medal.jpg"]),
    ("Reading list for the summer", &[]),
    ("Weekend hike in the mountains", &["/public/img/hike.jpg"]),
    ("New album on repeat all week", &[]),
    ("Board game night at my place on Friday", &[]),
];

const DEMO_GROUPS: &[(&str, &[&str])] = &[
    ("Runners of the city", &["/public/img/runners.jpg"]),
    ("Book club", &[]),
    ("Home cooks", &["/public/img/kitchen.jpg"]),
];

const DEMO_REQUESTS: &[(Option<&str>, FriendshipStatus)] = &[
    (Some("Hi! We met at the conference"), FriendshipStatus::Pending),
    (Some("Let's go running together"), FriendshipStatus::Accepted),
    (None, FriendshipStatus::Pending),
    (Some("Loved your post about the hike"), FriendshipStatus::Rejected),
    (Some("Old classmates!"), FriendshipStatus::Accepted),
    (Some("Fellow book club member here"), FriendshipStatus::Pending),
];

/// Record counts in each collection once seeding has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub posts: u64,
    pub groups: u64,
    pub friendship_requests: u64,
}

/// Loads the demo data set into a set of repositories. Not transactional:
/// a failure part-way leaves whatever was written so far.
pub struct Seeder {
    repos: Repositories,
    id_generator: Arc<SnowflakeGenerator>,
}

impl Seeder {
    pub fn new(repos: Repositories, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self { repos, id_generator }
    }

    pub async fn run<R: Rng>(&self, rng: &mut R) -> Result<SeedReport, AppError> {
        self.clear_all().await?;

        let users = self.create_users().await?;
        tracing::info!(count = users.len(), "Seeded users");

        let user_count = users.len();

        for (text, images) in DEMO_POSTS {
            let owner = &users[rng.random_range(0..user_count)];
            let now = Utc::now();
            self.repos
                .posts
                .create(&Post {
                    id: self.id_generator.generate(),
                    text: (*text).to_string(),
                    images: images.iter().map(|s| (*s).to_string()).collect(),
                    user_id: owner.id,
                    likes: Vec::new(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
        tracing::info!(count = DEMO_POSTS.len(), "Seeded posts");

        for (title, images) in DEMO_GROUPS {
            let admin = &users[rng.random_range(0..user_count)];
            let member = &users[rng.random_range(0..user_count)];
            let now = Utc::now();
            let mut group = Group {
                id: self.id_generator.generate(),
                title: (*title).to_string(),
                images: images.iter().map(|s| (*s).to_string()).collect(),
                admin_id: admin.id,
                post_ids: Vec::new(),
                member_ids: Vec::new(),
                created_at: now,
                updated_at: now,
            };
            group.add_member(member.id);
            self.repos.groups.create(&group).await?;
        }
        tracing::info!(count = DEMO_GROUPS.len(), "Seeded groups");

        if user_count >= 2 {
            for (message, status) in DEMO_REQUESTS {
                let (sender, recipient) = distinct_pair(rng, user_count);
                let now = Utc::now();
                self.repos
                    .friendships
                    .create(&FriendshipRequest {
                        id: self.id_generator.generate(),
                        sender_id: users[sender].id,
                        recipient_id: users[recipient].id,
                        message: message.map(str::to_string),
                        status: *status,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?;
            }
            tracing::info!(count = DEMO_REQUESTS.len(), "Seeded friendship requests");
        }

        self.report().await
    }

    async fn report(&self) -> Result<SeedReport, AppError> {
        Ok(SeedReport {
            users: self.repos.users.count().await?,
            posts: self.repos.posts.count().await?,
            groups: self.repos.groups.count().await?,
            friendship_requests: self.repos.friendships.count().await?,
        })
    }

    async fn clear_all(&self) -> Result<(), AppError> {
        let users = self.repos.users.clear().await?;
        let posts = self.repos.posts.clear().await?;
        let groups = self.repos.groups.clear().await?;
        let requests = self.repos.friendships.clear().await?;
        tracing::info!(users, posts, groups, requests, "Cleared existing data");

        Ok(())
    }

    async fn create_users(&self) -> Result<Vec<User>, AppError> {
        let mut created = Vec::with_capacity(DEMO_USERS.len());

        for demo in DEMO_USERS {
            let (year, month, day) = demo.birthday;
            let birthday_date = NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| AppError::Internal(format!("Bad demo birthday for {}", demo.email)))?;
            let now = Utc::now();

            let user = User {
                id: self.id_generator.generate(),
                email: demo.email.to_string(),
                password_hash: hash_password(demo.password)?,
                first_name: demo.first_name.to_string(),
                last_name: demo.last_name.to_string(),
                birthday_date,
                gender: demo.gender,
                profile_image: None,
                created_at: now,
                updated_at: now,
            };
            created.push(self.repos.users.create(&user).await?);
        }

        Ok(created)
    }
}

/// Two different indices below `len`. `len` must be at least 2.
fn distinct_pair<R: Rng>(rng: &mut R, len: usize) -> (usize, usize) {
    let first = rng.random_range(0..len);
    let mut second = rng.random_range(0..len - 1);
    if second >= first {
        second += 1;
    }
    (first, second)
}
