//! Plain-text rendering for the terminal shell

use std::io::{self, Write};

use crate::models::{AttendanceRecord, AttendanceSummary, Employee, Stats};
use crate::notifications::{Notification, NotificationKind};
use crate::validation::{FieldErrors, FormField};

/// One line per notification, prefixed by its kind
pub fn toast_line(notification: &Notification) -> String {
    let marker = match notification.kind {
        NotificationKind::Success => "[ok]",
        NotificationKind::Error => "[error]",
        NotificationKind::Warning => "[warn]",
    };
    format!("{} {}", marker, notification.message)
}

pub fn loading<W: Write>(w: &mut W, what: &str) -> io::Result<()> {
    writeln!(w, "Loading {}...", what)
}

/// Inline error panel shown in place of page content
pub fn error_panel<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(w, "Error")?;
    writeln!(w, "{}", "-".repeat(40))?;
    writeln!(w, "{}", message)
}

pub fn empty_state<W: Write>(w: &mut W, title: &str, hint: Option<&str>) -> io::Result<()> {
    writeln!(w, "{}", title)?;
    if let Some(hint) = hint {
        writeln!(w)?;
        writeln!(w, "{}", hint)?;
    }
    Ok(())
}

pub fn stat_cards<W: Write>(w: &mut W, stats: &Stats) -> io::Result<()> {
    let cards = [
        ("Total Employees", stats.total_employees),
        ("Attendance Records", stats.total_attendance_records),
        ("Present", stats.present_count),
        ("Absent", stats.absent_count),
    ];
    for (label, value) in cards {
        writeln!(w, "{:<20} {}", label, value)?;
    }
    Ok(())
}

pub fn employee_table<W: Write>(w: &mut W, employees: &[Employee]) -> io::Result<()> {
    writeln!(
        w,
        "{:<12} {:<24} {:<30} {:<18} {}",
        "Employee ID", "Name", "Email", "Department", "Joined"
    )?;
    writeln!(w, "{}", "-".repeat(96))?;
    for e in employees {
        writeln!(
            w,
            "{:<12} {:<24} {:<30} {:<18} {}",
            e.employee_id,
            e.full_name,
            e.email,
            e.department,
            e.created_at.format("%Y-%m-%d")
        )?;
    }
    Ok(())
}

pub fn employee_detail<W: Write>(w: &mut W, employee: &Employee) -> io::Result<()> {
    writeln!(w, "{:<12} {}", "Employee ID", employee.employee_id)?;
    writeln!(w, "{:<12} {}", "Name", employee.full_name)?;
    writeln!(w, "{:<12} {}", "Email", employee.email)?;
    writeln!(w, "{:<12} {}", "Department", employee.department)?;
    writeln!(
        w,
        "{:<12} {}",
        "Joined",
        employee.created_at.format("%Y-%m-%d %H:%M")
    )
}

pub fn attendance_table<W: Write>(w: &mut W, records: &[AttendanceRecord]) -> io::Result<()> {
    writeln!(
        w,
        "{:<12} {:<12} {:<24} {:<8} {}",
        "Date", "Employee ID", "Name", "Status", "Record"
    )?;
    writeln!(w, "{}", "-".repeat(80))?;
    for r in records {
        writeln!(
            w,
            "{:<12} {:<12} {:<24} {:<8} {}",
            r.date.format("%Y-%m-%d"),
            r.employee_id,
            r.employee_name.as_deref().unwrap_or("-"),
            r.status,
            r.id
        )?;
    }
    Ok(())
}

/// Summary figures exactly as the backend computed them
pub fn summary_panel<W: Write>(w: &mut W, summary: &AttendanceSummary) -> io::Result<()> {
    if summary.employee_name.is_empty() {
        writeln!(w, "Attendance summary for {}", summary.employee_id)?;
    } else {
        writeln!(
            w,
            "Attendance summary for {} ({})",
            summary.employee_name, summary.employee_id
        )?;
    }
    writeln!(w, "{}", "-".repeat(40))?;
    writeln!(w, "{:<14} {}", "Total Days", summary.total_days)?;
    writeln!(w, "{:<14} {}", "Present", summary.present_days)?;
    writeln!(w, "{:<14} {}", "Absent", summary.absent_days)?;
    writeln!(w, "{:<14} {}%", "Attendance", summary.attendance_percentage)
}

pub fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::EmployeeId => "Employee ID",
        FormField::FullName => "Full Name",
        FormField::Email => "Email",
        FormField::Department => "Department",
    }
}

pub fn field_errors<W: Write>(w: &mut W, errors: &FieldErrors) -> io::Result<()> {
    writeln!(w, "Please fix the following:")?;
    for (field, message) in errors.iter() {
        writeln!(w, "  {:<12} {}", field_label(field), message)?;
    }
    Ok(())
}
