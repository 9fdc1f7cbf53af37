use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "plantastic")]
#[command(about = "Keep track of your plants and their care reminders")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Manage your own plants
    #[command(subcommand)]
    Plants(PlantsCommand),
    /// Browse the plant catalog
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Catalog species added to your garden
    #[command(subcommand)]
    Garden(GardenCommand),
    /// Periodic care reminders
    #[command(subcommand)]
    Reminders(RemindersCommand),
    /// Show or edit your profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Show or change the theme
    #[command(subcommand)]
    Theme(ThemeCommand),
    /// Run the reminder scheduler until interrupted
    Run,
}

impl Command {
    /// Name the command is registered under
    pub fn name(&self) -> &'static str {
        match self {
            Command::Plants(_) => "plants",
            Command::Catalog(_) => "catalog",
            Command::Garden(_) => "garden",
            Command::Reminders(_) => "reminders",
            Command::Profile(_) => "profile",
            Command::Theme(_) => "theme",
            Command::Run => "run",
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PlantsCommand {
    List,
    Add(AddPlantArgs),
    Remove {
        id: String,
    },
    /// Record a watering now
    Water {
        id: String,
    },
    Mood {
        id: String,
        /// HAPPY, THIRSTY, SLEEPY, EXCITED or CONTENT
        mood: String,
    },
    /// Print a random care tip
    Tip {
        id: String,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddPlantArgs {
    pub name: String,
    /// Days between waterings
    #[arg(short = 'i', long = "interval", default_value_t = 7)]
    pub watering_interval: u32,
    #[arg(long, default_value = "")]
    pub image: String,
    /// Care tip, may be repeated
    #[arg(short = 't', long = "tip")]
    pub tips: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CatalogCommand {
    /// Search species by name; an empty query lists everything
    Search {
        #[arg(default_value = "")]
        query: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum GardenCommand {
    List,
    Add { catalog_id: String },
    Remove { catalog_id: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RemindersCommand {
    List,
    Add(AddReminderArgs),
    Cancel { id: String },
    /// Forget every saved reminder
    Clear,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddReminderArgs {
    pub title: String,
    pub description: String,
    /// Days between reminders
    pub frequency: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProfileCommand {
    Show,
    Set(ProfileArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub avatar: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ThemeCommand {
    Show,
    /// LIGHT, DARK or DYNAMIC
    Set { theme: String },
}
