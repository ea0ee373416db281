use clap::{Parser, Subcommand};
use his_core::{Country, CoreConfig, Doctor, Store, User};

#[derive(Parser)]
#[command(name = "his")]
#[command(about = "Health information system CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Add a country
    AddCountry {
        /// Country name
        cname: String,
        /// Population
        population: i64,
    },
    /// List all countries
    ListCountries,
    /// Add a user living in an existing country
    AddUser {
        email: String,
        name: String,
        surname: String,
        phone: String,
        /// Country name (must already exist)
        cname: String,
    },
    /// List all users
    ListUsers,
    /// Give an existing user the doctor role
    AddDoctor {
        email: String,
        /// Highest degree, e.g. MD
        degree: String,
        salary: i32,
    },
    /// List all doctors
    ListDoctors,
    /// Delete a user that has no remaining roles
    DeleteUser { email: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("No command given. Run with --help to see the available commands.");
        return Ok(());
    };

    let cfg = CoreConfig::from_env()?;
    let store = Store::connect(&cfg).await?;

    match command {
        Commands::Migrate => {
            store.migrate().await?;
            println!("Migrations applied to {}", cfg.database_url());
        }
        Commands::AddCountry { cname, population } => {
            let mut uow = store.begin().await?;
            match uow.countries().create(Country { cname, population }).await {
                Ok(country) => {
                    uow.commit().await?;
                    println!("Added country: {}", country.cname);
                }
                Err(e) => eprintln!("Error adding country: {}", e),
            }
        }
        Commands::ListCountries => {
            let mut uow = store.begin().await?;
            let countries = uow.countries().list().await?;
            if countries.is_empty() {
                println!("No countries found.");
            }
            for country in countries {
                println!("{} (population {})", country.cname, country.population);
            }
        }
        Commands::AddUser {
            email,
            name,
            surname,
            phone,
            cname,
        } => {
            let user = User {
                email,
                name,
                surname,
                phone,
                cname,
            };
            let mut uow = store.begin().await?;
            match uow.users().create(user).await {
                Ok(user) => {
                    uow.commit().await?;
                    println!("Added user: {}", user.email);
                }
                Err(e) => eprintln!("Error adding user: {}", e),
            }
        }
        Commands::ListUsers => {
            let mut uow = store.begin().await?;
            let users = uow.users().list().await?;
            if users.is_empty() {
                println!("No users found.");
            }
            for user in users {
                println!(
                    "Email: {}, Name: {} {}, Phone: {}, Country: {}",
                    user.email, user.name, user.surname, user.phone, user.cname
                );
            }
        }
        Commands::AddDoctor {
            email,
            degree,
            salary,
        } => {
            let doctor = Doctor {
                email,
                degree,
                salary,
            };
            let mut uow = store.begin().await?;
            match uow.doctors().create(doctor).await {
                Ok(doctor) => {
                    uow.commit().await?;
                    println!("Added doctor: {}", doctor.email);
                }
                Err(e) => eprintln!("Error adding doctor: {}", e),
            }
        }
        Commands::ListDoctors => {
            let mut uow = store.begin().await?;
            let doctors = uow.doctors().list().await?;
            if doctors.is_empty() {
                println!("No doctors found.");
            }
            for doctor in doctors {
                println!(
                    "Email: {}, Degree: {}, Salary: {}",
                    doctor.email, doctor.degree, doctor.salary
                );
            }
        }
        Commands::DeleteUser { email } => {
            let mut uow = store.begin().await?;
            match uow.users().delete(&email).await {
                Ok(()) => {
                    uow.commit().await?;
                    println!("Deleted user: {}", email);
                }
                Err(e) => eprintln!("Error deleting user: {}", e),
            }
        }
    }

    store.close().await;
    Ok(())
}
