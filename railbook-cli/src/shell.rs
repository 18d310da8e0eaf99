use chrono::NaiveDate;
use railbook_booking::{BookingError, ReservationEngine};
use railbook_core::Session;
use railbook_directory::DirectoryError;
use std::io::{self, BufRead, Write};

/// The search selection remembered between the "search" and "book" steps.
struct SelectedRoute {
    train_id: String,
    source: String,
    destination: String,
}

/// Interactive menu loop over stdin/stdout. Sole caller of the engine's
/// public operations; renders every business failure as a plain text line
/// and keeps running through per-command I/O faults.
pub struct Shell {
    engine: ReservationEngine,
    session: Option<Session>,
    selected: Option<SelectedRoute>,
}

impl Shell {
    pub fn new(engine: ReservationEngine) -> Self {
        Self {
            engine,
            session: None,
            selected: None,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        println!("Railbook — train reservation");

        loop {
            println!();
            println!("Choose an option:");
            println!("1. Sign up");
            println!("2. Login");
            println!("3. Fetch bookings");
            println!("4. Search trains");
            println!("5. Book a seat");
            println!("6. Cancel booking");
            println!("7. Exit");

            let choice = match self.prompt("> ")? {
                Some(line) => line,
                None => return Ok(()), // stdin closed
            };

            match choice.as_str() {
                "1" => self.sign_up()?,
                "2" => self.login()?,
                "3" => self.fetch_bookings(),
                "4" => self.search_trains()?,
                "5" => self.book_seat()?,
                "6" => self.cancel_booking()?,
                "7" => {
                    println!("Goodbye!");
                    return Ok(());
                }
                _ => println!("Invalid option"),
            }
        }
    }

    fn sign_up(&mut self) -> io::Result<()> {
        let Some(name) = self.prompt("Username: ")? else { return Ok(()) };
        let Some(password) = self.prompt("Password: ")? else { return Ok(()) };

        match self.engine.sign_up(&name, &password) {
            Ok(_) => println!("Signup successful, please log in"),
            Err(DirectoryError::AlreadyExists(_)) => println!("Username already exists"),
            Err(err) => report_fault(&err),
        }
        Ok(())
    }

    fn login(&mut self) -> io::Result<()> {
        let Some(name) = self.prompt("Username: ")? else { return Ok(()) };
        let Some(password) = self.prompt("Password: ")? else { return Ok(()) };

        match self.engine.login(&name, &password) {
            Ok(Some(session)) => {
                println!("Welcome, {}", session.name);
                self.session = Some(session);
            }
            Ok(None) => println!("Invalid credentials"),
            Err(err) => report_fault(&err),
        }
        Ok(())
    }

    fn fetch_bookings(&mut self) {
        let Some(session) = self.session.clone() else {
            println!("Please log in first");
            return;
        };

        match self.engine.fetch_bookings(&session) {
            Ok(tickets) if tickets.is_empty() => println!("No bookings found"),
            Ok(tickets) => {
                for ticket in tickets {
                    println!("{ticket}");
                }
            }
            Err(err) => report_fault(&err),
        }
    }

    fn search_trains(&mut self) -> io::Result<()> {
        let Some(source) = self.prompt("Source: ")? else { return Ok(()) };
        let Some(destination) = self.prompt("Destination: ")? else { return Ok(()) };

        let listings: Vec<(String, Vec<String>)> = self
            .engine
            .search_trains(&source, &destination)
            .iter()
            .map(|train| {
                let times = train
                    .station_times
                    .iter()
                    .map(|(station, time)| format!("   {station} -> {time}"))
                    .collect();
                (train.train_id.clone(), times)
            })
            .collect();

        if listings.is_empty() {
            println!("No trains found");
            return Ok(());
        }

        for (index, (train_id, times)) in listings.iter().enumerate() {
            println!("{}. Train {}", index + 1, train_id);
            for line in times {
                println!("{line}");
            }
        }

        let Some(choice) = self.prompt(&format!("Select train (1-{}): ", listings.len()))? else {
            return Ok(());
        };
        match choice.parse::<usize>() {
            Ok(n) if n >= 1 && n <= listings.len() => {
                self.selected = Some(SelectedRoute {
                    train_id: listings[n - 1].0.clone(),
                    source,
                    destination,
                });
                println!("Selected train {}", listings[n - 1].0);
            }
            _ => println!("Invalid selection"),
        }
        Ok(())
    }

    fn book_seat(&mut self) -> io::Result<()> {
        let Some(session) = self.session.clone() else {
            println!("Please log in first");
            return Ok(());
        };
        let Some(route) = self.selected.as_ref() else {
            println!("Please search and select a train first");
            return Ok(());
        };
        let (train_id, source, destination) = (
            route.train_id.clone(),
            route.source.clone(),
            route.destination.clone(),
        );

        match self.engine.train_by_id(&train_id) {
            Some(train) => {
                println!("Seat map (0 = free, 1 = occupied):");
                for row in train.seats.rows() {
                    let line: Vec<String> = row.iter().map(|s| s.to_string()).collect();
                    println!("{}", line.join(" "));
                }
            }
            None => {
                println!("Selected train is no longer available");
                self.selected = None;
                return Ok(());
            }
        }

        let Some(row) = self.prompt_number("Row: ")? else { return Ok(()) };
        let Some(seat) = self.prompt_number("Seat: ")? else { return Ok(()) };
        let Some(date_raw) = self.prompt("Travel date (YYYY-MM-DD): ")? else {
            return Ok(());
        };
        let Ok(date) = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d") else {
            println!("Invalid date");
            return Ok(());
        };

        match self
            .engine
            .book_seat(&session, &train_id, row, seat, &source, &destination, date)
        {
            Ok(ticket) => {
                println!("Seat booked successfully");
                println!("{ticket}");
            }
            Err(BookingError::SeatUnavailable { .. }) => println!("Seat not available"),
            Err(BookingError::InvalidRoute { .. }) => {
                println!("That train does not run this route in this direction")
            }
            Err(BookingError::DateInPast(_)) => println!("Travel date is in the past"),
            Err(BookingError::TrainNotFound(_)) => println!("Selected train is no longer available"),
            Err(BookingError::NotAuthenticated) => println!("Please log in first"),
            Err(err) => report_fault(&err),
        }
        Ok(())
    }

    fn cancel_booking(&mut self) -> io::Result<()> {
        let Some(session) = self.session.clone() else {
            println!("Please log in first");
            return Ok(());
        };
        let Some(ticket_id) = self.prompt("Ticket ID to cancel: ")? else {
            return Ok(());
        };

        match self.engine.cancel(&session, &ticket_id) {
            Ok(true) => println!("Ticket cancelled"),
            Ok(false) => println!("Ticket not found"),
            Err(BookingError::NotAuthenticated) => println!("Please log in first"),
            Err(err) => report_fault(&err),
        }
        Ok(())
    }

    /// Print a prompt and read one trimmed line. `None` means stdin closed.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        print!("{label}");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_number(&mut self, label: &str) -> io::Result<Option<usize>> {
        let Some(raw) = self.prompt(label)? else { return Ok(None) };
        match raw.parse::<usize>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                println!("Invalid number");
                Ok(None)
            }
        }
    }
}

/// I/O faults abort the current command but never the shell.
fn report_fault(err: &dyn std::error::Error) {
    tracing::error!(%err, "command failed");
    println!("Operation failed, please try again");
}
