/*!
Static demonstration datasets behind the module views.

There is no backend; every module renders a hard-coded table, the same
way the original demo data was held in memory. Rows here are display
text only and carry no invariants.
*/
use serde::Serialize;

use crate::access::ModuleId;

/// One module's demo table: a header row and some data rows.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Dataset {
    pub headers: &'static [&'static str],
    pub rows: &'static [&'static [&'static str]],
}

static DASHBOARD: Dataset = Dataset {
    headers: &["Metric", "Value"],
    rows: &[
        &["Total Students", "1,284"],
        &["Total Teachers", "86"],
        &["Attendance Today", "94.2%"],
        &["Fees Collected (Month)", "$128,430"],
        &["Pending Notices", "3"],
    ],
};

static STUDENTS: Dataset = Dataset {
    headers: &["ID", "Name", "Grade", "Section", "Attendance"],
    rows: &[
        &["STU001", "Alex Rodriguez", "10", "A", "96%"],
        &["STU002", "Emma Thompson", "10", "A", "92%"],
        &["STU003", "James Wilson", "10", "B", "88%"],
        &["STU004", "Sophia Lee", "11", "A", "98%"],
        &["STU005", "Daniel Kim", "11", "C", "85%"],
    ],
};

static ATTENDANCE: Dataset = Dataset {
    headers: &["Date", "Class", "Present", "Absent", "Rate"],
    rows: &[
        &["2024-03-04", "10-A", "28", "2", "93%"],
        &["2024-03-04", "10-B", "26", "4", "87%"],
        &["2024-03-04", "11-A", "30", "0", "100%"],
        &["2024-03-05", "10-A", "29", "1", "97%"],
    ],
};

static ACADEMICS: Dataset = Dataset {
    headers: &["Course", "Class", "Teacher", "Progress"],
    rows: &[
        &["Mathematics", "10-A", "Prof. Michael Chen", "Chapter 7 of 12"],
        &["Physics", "10-A", "Dr. Lisa Park", "Chapter 5 of 10"],
        &["English Literature", "10-B", "Ms. Rachel Green", "Chapter 9 of 14"],
        &["Computer Science", "11-A", "Mr. David Kumar", "Chapter 4 of 8"],
    ],
};

static EXAMS: Dataset = Dataset {
    headers: &["Examination", "Class", "Date", "Status"],
    rows: &[
        &["Mid-Term Mathematics", "10-A", "2024-03-18", "Scheduled"],
        &["Mid-Term Physics", "10-A", "2024-03-20", "Scheduled"],
        &["Unit Test English", "10-B", "2024-03-08", "Graded"],
        &["Practical Computer Science", "11-A", "2024-03-12", "Scheduled"],
    ],
};

static FEES: Dataset = Dataset {
    headers: &["Student", "Term", "Amount", "Status"],
    rows: &[
        &["Alex Rodriguez", "Spring 2024", "$2,400", "Paid"],
        &["Emma Thompson", "Spring 2024", "$2,400", "Pending"],
        &["James Wilson", "Spring 2024", "$2,400", "Overdue"],
        &["Sophia Lee", "Spring 2024", "$2,650", "Paid"],
    ],
};

static TRANSPORT: Dataset = Dataset {
    headers: &["Route", "Driver", "Capacity", "Assigned"],
    rows: &[
        &["Route 1 - North Campus", "Robert Hayes", "40", "37"],
        &["Route 2 - Riverside", "Angela Moore", "40", "31"],
        &["Route 3 - Hillcrest", "Tom Becker", "30", "30"],
    ],
};

static HOSTEL: Dataset = Dataset {
    headers: &["Block", "Room", "Capacity", "Occupied"],
    rows: &[
        &["A (Boys)", "A-101", "4", "4"],
        &["A (Boys)", "A-102", "4", "3"],
        &["B (Girls)", "B-201", "4", "4"],
        &["B (Girls)", "B-202", "2", "1"],
    ],
};

static NOTICES: Dataset = Dataset {
    headers: &["Date", "Title", "Audience"],
    rows: &[
        &["2024-03-01", "Spring break schedule", "All"],
        &["2024-03-03", "Mid-term examination timetable", "Students, Parents"],
        &["2024-03-05", "Staff meeting Friday 3pm", "Teachers"],
    ],
};

static REPORTS: Dataset = Dataset {
    headers: &["Report", "Period", "Coverage"],
    rows: &[
        &["Attendance Summary", "February 2024", "All classes"],
        &["Fee Collection", "Q1 2024", "All students"],
        &["Academic Performance", "Mid-term", "Grades 10-12"],
    ],
};

/// The demo table for `module`. Total over the module set.
pub fn dataset(module: ModuleId) -> &'static Dataset {
    match module {
        ModuleId::Dashboard  => &DASHBOARD,
        ModuleId::Students   => &STUDENTS,
        ModuleId::Attendance => &ATTENDANCE,
        ModuleId::Academics  => &ACADEMICS,
        ModuleId::Exams      => &EXAMS,
        ModuleId::Fees       => &FEES,
        ModuleId::Transport  => &TRANSPORT,
        ModuleId::Hostel     => &HOSTEL,
        ModuleId::Notices    => &NOTICES,
        ModuleId::Reports    => &REPORTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ALL_MODULES;
    use crate::tests::ensure_logging;

    #[test]
    fn every_module_has_consistent_data() {
        ensure_logging();
        for module in ALL_MODULES.iter() {
            let data = dataset(*module);
            assert!(!data.headers.is_empty());
            assert!(!data.rows.is_empty());
            for row in data.rows.iter() {
                assert_eq!(row.len(), data.headers.len());
            }
        }
    }
}
