use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the accountability service (POST /ask, GET /chat-history)
    Serve {
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Ask a single question and print the accountability report
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Continue an existing conversation
        #[arg(short, long)]
        session: Option<i64>,
    },

    /// Interactive conversation; /new starts over, /quit exits
    Chat {
        #[arg(short, long)]
        session: Option<i64>,
    },

    /// Show past conversations grouped by date
    History,
}
