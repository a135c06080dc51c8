use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Guesthouse bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Open the main menu")]
    Start,
    #[command(description = "Register a new booking")]
    Book,
    #[command(description = "Browse bookings by room")]
    Bookings,
    #[command(description = "Show room photos")]
    Rooms,
    #[command(description = "Show the booking report")]
    Stats,
    #[command(description = "Abort the current dialog")]
    Cancel,
}
