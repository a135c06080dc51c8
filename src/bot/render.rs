//! MarkdownV2 texts sent by the bot. Everything dynamic goes through
//! `escape_markdown`.

use chrono::NaiveDate;

use crate::bot::wizard::{BookingWizard, GuestProfile};
use crate::database::models::{BookingCounts, BookingDetails, BookingStatus, Room};
use crate::services::availability::Stay;
use crate::utils::datetime::format_date;
use crate::utils::markdown::{bold, escape_markdown};

pub fn status_label(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Booked => "Booked",
        BookingStatus::Completed => "Completed",
        BookingStatus::Canceled => "Canceled",
    }
}

fn stay_line(stay: &Stay) -> String {
    escape_markdown(&format!(
        "{} – {} ({} nights)",
        format_date(&stay.start),
        format_date(&stay.end),
        stay.nights()
    ))
}

pub fn welcome(is_admin: bool) -> String {
    if is_admin {
        format!(
            "👋 {}\n\nUse the buttons below to register a booking or look up existing ones\\.",
            bold("Welcome!")
        )
    } else {
        escape_markdown("⛔ This bot is for guesthouse staff only.")
    }
}

pub fn main_menu() -> String {
    bold("Main menu")
}

pub fn guest_summary(guest: &GuestProfile) -> String {
    let description = if guest.description.is_empty() {
        "–"
    } else {
        guest.description.as_str()
    };
    format!(
        "👤 Name: {}\n📱 Phone: {}\n📝 Notes: {}",
        escape_markdown(&guest.name),
        escape_markdown(&format!("+{}", guest.phone)),
        escape_markdown(description)
    )
}

/// Prompt shown when the wizard enters `state`.
pub fn wizard_prompt(state: &BookingWizard) -> String {
    match state {
        BookingWizard::Phone => escape_markdown("📱 Enter the guest's phone number, e.g. +7 912 345-67-89."),
        BookingWizard::ReturningGuest { guest } => format!(
            "{}\n\n{}\n\n{}",
            bold("This guest has stayed with us before. Check the details:"),
            guest_summary(guest),
            escape_markdown("Is everything correct?")
        ),
        BookingWizard::Name { .. } => escape_markdown("👤 Enter the guest's name."),
        BookingWizard::Description { .. } => {
            escape_markdown("📝 Enter a short note about the guest (or '-' if none).")
        }
        BookingWizard::NewGuest { guest } => format!(
            "{}\n\n{}\n\n{}",
            bold("New guest"),
            guest_summary(guest),
            escape_markdown("Is everything correct?")
        ),
        BookingWizard::Room { guest } => format!(
            "🛏 Choose a room for {}\\.",
            escape_markdown(&guest.name)
        ),
        BookingWizard::StartDate { room_id, .. } => escape_markdown(&format!(
            "📅 Room #{room_id}. Enter the check-in date (DD.MM.YYYY)."
        )),
        BookingWizard::EndDate { start, .. } => escape_markdown(&format!(
            "📅 Check-in {}. Enter the check-out date (DD.MM.YYYY).",
            format_date(start)
        )),
        BookingWizard::Cost { stay, .. } => format!(
            "💰 {}\n{}",
            stay_line(stay),
            escape_markdown("Enter the total cost of the stay in rubles.")
        ),
        BookingWizard::Confirmation { guest, room_id, stay, cost } => format!(
            "{}\n\n{}\n🛏 Room: \\#{}\n📅 {}\n💰 Cost: {}\n\n{}",
            bold("Confirm the booking"),
            guest_summary(guest),
            room_id,
            stay_line(stay),
            escape_markdown(&format!("{cost} RUB")),
            escape_markdown("Create this booking?")
        ),
    }
}

pub fn booking_card(booking: &BookingDetails) -> String {
    let stay = Stay {
        start: booking.date_start,
        end: booking.date_end,
    };
    let description = if booking.guest_description.is_empty() {
        "–"
    } else {
        booking.guest_description.as_str()
    };

    format!(
        "{}\n\n📅 {}\n📌 Status: {}\n💰 Cost: {}\n💸 Paid: {}\n🧾 Due: {}\n👤 {}\n📱 {}\n📝 {}",
        bold(&format!("Booking №{} · room #{}", booking.id, booking.room_id)),
        stay_line(&stay),
        status_label(booking.status),
        escape_markdown(&format!("{} RUB", booking.cost)),
        escape_markdown(&format!("{} RUB", booking.total_paid)),
        escape_markdown(&format!("{} RUB", booking.balance_due())),
        escape_markdown(&booking.guest_name),
        escape_markdown(&format!("+{}", booking.guest_phone)),
        escape_markdown(description)
    )
}

pub fn listing_found(count: usize, room_id: i64, year: Option<i32>) -> String {
    let scope = match year {
        Some(year) => format!("in {year}"),
        None => "upcoming".to_string(),
    };
    escape_markdown(&format!(
        "Found {count} bookings {scope} for room #{room_id}. Show them?"
    ))
}

pub fn room_photos(rooms: &[Room]) -> String {
    if rooms.is_empty() {
        return escape_markdown("No rooms have been added yet.");
    }

    let mut text = bold("Room photos");
    text.push('\n');
    for room in rooms {
        text.push_str(&format!(
            "\n🛏 {} – {}\n{}",
            escape_markdown(&format!("#{}", room.id)),
            escape_markdown(&room.description),
            escape_markdown(&room.photo_url)
        ));
    }
    text
}

pub fn report(counts: &BookingCounts, outstanding: i64) -> String {
    format!(
        "{}\n\n📌 Booked: {}\n✅ Completed: {}\n🚫 Canceled: {}\n📚 Total: {}\n\n🧾 Outstanding on live bookings: {}",
        bold("Booking report"),
        counts.booked,
        counts.completed,
        counts.canceled,
        counts.total(),
        escape_markdown(&format!("{outstanding} RUB"))
    )
}

fn digest_line(booking: &BookingDetails) -> String {
    escape_markdown(&format!(
        "• Room #{}: {} (+{}), {} – {}, cost {} RUB, paid {} RUB",
        booking.room_id,
        booking.guest_name,
        booking.guest_phone,
        format_date(&booking.date_start),
        format_date(&booking.date_end),
        booking.cost,
        booking.total_paid
    ))
}

/// Morning digest for admins, or `None` when nothing happens today.
pub fn daily_digest(
    date: NaiveDate,
    check_ins: &[BookingDetails],
    check_outs: &[BookingDetails],
) -> Option<String> {
    if check_ins.is_empty() && check_outs.is_empty() {
        return None;
    }

    let mut text = bold(&format!("Today, {}", format_date(&date)));

    if !check_ins.is_empty() {
        text.push_str(&format!("\n\n🛬 {}", bold("Check-ins")));
        for booking in check_ins {
            text.push('\n');
            text.push_str(&digest_line(booking));
        }
    }

    if !check_outs.is_empty() {
        text.push_str(&format!("\n\n🛫 {}", bold("Check-outs")));
        for booking in check_outs {
            text.push('\n');
            text.push_str(&digest_line(booking));
        }
    }

    Some(text)
}
