//! # Seed Data Generator
//!
//! Populates a database with a demo branch for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./inn_dev.db with the default admin password
//! cargo run -p inn-db --bin seed
//!
//! # Specify database path and admin password
//! cargo run -p inn-db --bin seed -- --db ./data/inn.db --password s3cret
//! ```
//!
//! ## Generated Data
//! - One branch ("Main") with an `admin` desk user
//! - Rooms across three types, priced per block of hours
//! - A small service catalog (laundry, breakfast, ...)
//! - A handful of guests
//! - Inventory categories and starting stock

use std::env;

use inn_core::{
    GuestInput, InventoryCategoryInput, InventoryItemInput, Money, RoomInput, RoomStatus,
    ServiceInput, SessionContext,
};
use inn_db::{Database, DbConfig};

/// (room_number, room_type, min_hours, base_price, extra_hour_price, capacity)
const ROOMS: &[(&str, &str, i64, i64, i64, i64)] = &[
    ("101", "Standard", 3, 350, 80, 2),
    ("102", "Standard", 3, 350, 80, 2),
    ("103", "Standard", 3, 350, 80, 2),
    ("201", "Deluxe", 4, 500, 100, 2),
    ("202", "Deluxe", 4, 500, 100, 3),
    ("301", "Family", 6, 900, 150, 5),
];

/// (name, price)
const SERVICES: &[(&str, i64)] = &[
    ("Laundry", 150),
    ("Breakfast", 220),
    ("Extra bed", 300),
    ("Airport pickup", 800),
];

const GUESTS: &[(&str, &str)] = &[
    ("Ana Reyes", "0917 555 0101"),
    ("Marco Santos", "0918 555 0102"),
    ("Liza Cruz", "0919 555 0103"),
];

/// (category, [(item, quantity, unit)])
const INVENTORY: &[(&str, &[(&str, i64, &str)])] = &[
    (
        "Linen",
        &[("Bath towel", 40, "pcs"), ("Bed sheet", 30, "pcs")],
    ),
    (
        "Toiletries",
        &[("Soap", 120, "pcs"), ("Shampoo", 80, "bottles")],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./inn_dev.db");
    let mut password = String::from("admin123");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-d" | "--db" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "-p" | "--password" => {
                if i + 1 < args.len() {
                    password = args[i + 1].clone();
                    i += 1;
                }
            }
            "-h" | "--help" => {
                println!("Inn Desk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>          Database file path (default: ./inn_dev.db)");
                println!("  -p, --password <PASS>    Password for the admin user (default: admin123)");
                println!("  -h, --help               Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Inn Desk Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.users().get_by_username("admin").await?.is_some() {
        println!("⚠ Database already has an admin user");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let branch_id = db.users().create_branch("Main").await?;
    let admin = db
        .users()
        .create_user(branch_id, "admin", &password, "admin")
        .await?;

    let session = SessionContext {
        user_id: admin.id,
        branch_id,
        role: admin.role.clone(),
    };

    println!("✓ Branch 'Main' (id {}) with user 'admin'", branch_id);

    for (number, room_type, min_hours, base, extra, capacity) in ROOMS {
        let input = RoomInput {
            room_number: number.to_string(),
            room_type: room_type.to_string(),
            status: RoomStatus::Available,
            min_hours: *min_hours,
            base_price: Money::from_major(*base),
            extra_hour_price: Money::from_major(*extra),
            capacity: *capacity,
        };
        db.rooms().create(&session, &input).await?;
    }
    println!("✓ {} rooms", ROOMS.len());

    for (name, price) in SERVICES {
        let input = ServiceInput {
            name: name.to_string(),
            price: Money::from_major(*price),
        };
        db.services().create(&session, &input).await?;
    }
    println!("✓ {} services", SERVICES.len());

    for (name, phone) in GUESTS {
        let input = GuestInput {
            full_name: name.to_string(),
            phone: Some(phone.to_string()),
            email: None,
        };
        db.guests().create(&session, &input).await?;
    }
    println!("✓ {} guests", GUESTS.len());

    let mut items = 0;
    for (category, stock) in INVENTORY {
        let category_id = db
            .inventory()
            .save_category(
                &session,
                &InventoryCategoryInput {
                    id: None,
                    name: category.to_string(),
                    description: None,
                },
            )
            .await?
            .id();

        for (name, quantity, unit) in stock.iter() {
            let input = InventoryItemInput {
                id: None,
                name: name.to_string(),
                category_id: Some(category_id),
                quantity: *quantity,
                unit: unit.to_string(),
                description: None,
            };
            db.inventory().save_item(&session, &input).await?;
            items += 1;
        }
    }
    println!("✓ {} inventory items in {} categories", items, INVENTORY.len());

    println!();
    println!("✓ Seed complete! Log in as 'admin'.");

    Ok(())
}
