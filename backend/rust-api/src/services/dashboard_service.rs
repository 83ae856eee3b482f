use crate::models::{
    dashboard::{
        ActivityItem, ActivityKind, ClassActivity, ClassCompetencyAverage, CompetencyProgress,
        DailyProgress, Dashboard, Priority, StatCard, StrugglingStudent, StudentDashboard,
        TeacherDashboard, UpcomingTask,
    },
    user::UserRole,
    Accent,
};

const CLASS_SIZE: u32 = 28;

pub fn dashboard(role: UserRole) -> Dashboard {
    match role {
        UserRole::Student => Dashboard::Student(student_dashboard()),
        UserRole::Teacher => Dashboard::Teacher(teacher_dashboard()),
    }
}

fn stat(title: &str, value: &str, change: &str, accent: Accent) -> StatCard {
    StatCard {
        title: title.to_string(),
        value: value.to_string(),
        change: change.to_string(),
        accent,
    }
}

fn student_dashboard() -> StudentDashboard {
    let stats = vec![
        stat("Competencies Mastered", "12", "+2", Accent::Blue),
        stat("Learning Hours", "48", "+6", Accent::Green),
        stat("Assessments Completed", "24", "+3", Accent::Purple),
        stat("Achievements Earned", "8", "+1", Accent::Orange),
    ];

    let competencies = [
        ("Problem Solving", 85, Accent::Blue),
        ("Critical Thinking", 72, Accent::Green),
        ("Communication", 90, Accent::Purple),
        ("Collaboration", 68, Accent::Orange),
    ]
    .into_iter()
    .map(|(name, progress, accent)| CompetencyProgress {
        name: name.to_string(),
        progress,
        accent,
    })
    .collect();

    // (day, mathematics, science, language, social)
    let weekly_progress = [
        ("Mon", 75, 68, 82, 71),
        ("Tue", 78, 72, 84, 73),
        ("Wed", 82, 75, 86, 76),
        ("Thu", 85, 78, 88, 79),
        ("Fri", 88, 82, 90, 82),
        ("Sat", 90, 85, 92, 85),
        ("Sun", 92, 88, 94, 88),
    ]
    .into_iter()
    .map(|(day, mathematics, science, language, social)| DailyProgress {
        day: day.to_string(),
        mathematics,
        science,
        language,
        social,
    })
    .collect();

    let recent_activity = [
        ("Completed Mathematics Assessment", "2 hours ago", ActivityKind::Assessment),
        ("Watched: Algebraic Equations Video", "1 day ago", ActivityKind::Resource),
        ("Earned Problem Solver Badge", "2 days ago", ActivityKind::Achievement),
    ]
    .into_iter()
    .zip(1..)
    .map(|((title, time, kind), id)| ActivityItem {
        id,
        title: title.to_string(),
        time: time.to_string(),
        kind,
    })
    .collect();

    let upcoming_tasks = [
        ("Science Lab Report", "Tomorrow", Priority::High),
        ("Literature Analysis Quiz", "Friday", Priority::Medium),
        ("History Timeline Project", "Next Week", Priority::Low),
    ]
    .into_iter()
    .zip(1..)
    .map(|((title, due, priority), id)| UpcomingTask {
        id,
        title: title.to_string(),
        due: due.to_string(),
        priority,
    })
    .collect();

    StudentDashboard {
        stats,
        competencies,
        weekly_progress,
        recent_activity,
        upcoming_tasks,
    }
}

fn teacher_dashboard() -> TeacherDashboard {
    let stats = vec![
        stat("Total Students", &CLASS_SIZE.to_string(), "+2", Accent::Blue),
        stat("Avg. Progress", "78%", "+5%", Accent::Green),
        stat("Need Attention", "4", "-1", Accent::Red),
        stat("Assessments Created", "15", "+3", Accent::Purple),
    ];

    let class_overview = [
        ("Problem Solving", 78),
        ("Critical Thinking", 82),
        ("Communication", 75),
        ("Collaboration", 80),
        ("Creativity", 73),
    ]
    .into_iter()
    .map(|(competency, average)| ClassCompetencyAverage {
        competency: competency.to_string(),
        average,
        students: CLASS_SIZE,
    })
    .collect();

    let needs_attention = [
        ("Alex Johnson", "Mathematics", 45),
        ("Sarah Kim", "Science", 52),
        ("Mike Chen", "Language Arts", 48),
    ]
    .into_iter()
    .map(|(name, competency, progress)| StrugglingStudent {
        name: name.to_string(),
        competency: competency.to_string(),
        progress,
    })
    .collect();

    let recent_activity = [
        ("Emma Watson", "Completed Science Assessment", Some("92%"), "1 hour ago"),
        ("John Doe", "Started Mathematics Module", None, "2 hours ago"),
        ("Lisa Park", "Earned Critical Thinker Badge", None, "3 hours ago"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((student, action, score, time), id)| ClassActivity {
        id,
        student: student.to_string(),
        action: action.to_string(),
        score: score.map(str::to_string),
        time: time.to_string(),
    })
    .collect();

    TeacherDashboard {
        stats,
        class_overview,
        needs_attention,
        recent_activity,
    }
}
