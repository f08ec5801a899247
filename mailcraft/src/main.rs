//! Mailcraft - e-mail etiquette lesson in the terminal

use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lesson::{script, QuizPhase, Stage};
use mailcraft::{
    command::{CommandError, HELP},
    Args, Command, LessonSession, Notice,
};
use scorm::{LmsReporter, StaticFrame};
use tutor_agent::TutorService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = args.resolve()?;

    // Logs go to stderr so they stay out of the lesson text
    let log_level = config.general.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mailcraft={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let tutor = if args.offline {
        info!("Offline mode, tutor uses canned feedback");
        TutorService::offline(config.tutor.clone())
    } else {
        TutorService::from_config(config.tutor.clone())
    };

    // A terminal is a top-level frame with no LMS above it
    let lms = LmsReporter::new(Box::new(StaticFrame::new()), config.lms.clone());

    let mut session = LessonSession::from_config(&config, Arc::new(tutor), lms);

    let mut busy = session.busy();
    tokio::spawn(async move {
        while busy.changed().await.is_ok() {
            if *busy.borrow_and_update() {
                println!("⏳ المعلم الآلي يقرأ رسالتك...");
            }
        }
    });

    println!("مرحباً بك في درس البريد الإلكتروني! اكتب اسمك ثم submit للبدء. (help للمساعدة)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        print_notices(&session.poll_background());

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        run(&mut session, command).await;
    }

    session.shutdown();
    Ok(())
}

async fn run(session: &mut LessonSession, command: Command) {
    let result = match command {
        Command::Name(name) => session.set_student_name(&name).map(|_| Vec::new()),
        Command::Set(field, value) => {
            session.set_field(field, &value);
            Ok(Vec::new())
        }
        Command::Style(style) => Ok(session.toggle_style(style)),
        Command::Color(color) => Ok(session.set_text_color(&color)),
        Command::Attach => Ok(session.attach_image()),
        Command::ImageStyle(style) => session.apply_image_style(style),
        Command::Template => {
            session.load_template();
            print_draft(session);
            Ok(Vec::new())
        }
        Command::Clear => {
            session.clear_document();
            Ok(Vec::new())
        }
        Command::AddContact { name, email } => session.add_contact(&name, &email).map(|(contact, notices)| {
            println!("تمت إضافة {} <{}>", contact.name, contact.email);
            notices
        }),
        Command::Favorite(id) => session.toggle_favorite(&id).map(|starred| {
            println!("{}", if starred { "⭐ أضيف إلى المفضلة" } else { "أزيل من المفضلة" });
            Vec::new()
        }),
        Command::Fix(id) => session.fix_word(id),
        Command::Dismiss(id) => session.dismiss_suggestion(id).map(|_| Vec::new()),
        Command::Answer(choice) => session.answer_quiz(choice).await,
        Command::Claim => session.claim_certificate().await,
        Command::Submit => Ok(session.submit().await),
        Command::Status => {
            print_status(session);
            Ok(Vec::new())
        }
        Command::Show => {
            print_draft(session);
            Ok(Vec::new())
        }
        Command::Contacts => {
            print_contacts(session);
            Ok(Vec::new())
        }
        Command::Export => {
            match session.export_certificate() {
                Ok(path) => println!("📄 {}", path.display()),
                Err(e) => {
                    error!(error = %e, "Certificate export failed");
                    println!("حدث خطأ أثناء تحميل الشهادة. يرجى المحاولة مرة أخرى.");
                }
            }
            Ok(Vec::new())
        }
        Command::Restart => Ok(session.restart()),
        Command::Help => {
            println!("{}", HELP);
            Ok(Vec::new())
        }
        Command::Quit => Ok(Vec::new()),
    };

    match result {
        Ok(notices) => print_notices(&notices),
        Err(e) => println!("⚠ {}", e),
    }

    if session.stage() == Stage::Quiz {
        print_quiz(session);
    }
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice {
            Notice::Message { text, .. } => println!("💬 {}", text),
            Notice::MissionBrief { stage } => {
                if let Some(brief) = script::mission_brief(*stage) {
                    println!("{} {}", brief.icon, brief.title);
                    for (i, step) in brief.steps.iter().enumerate() {
                        println!("  {}. {}", i + 1, step);
                    }
                }
            }
            Notice::Focus { hint } => println!("👉 {:?}", hint),
            Notice::Points { gained, total } => println!("+{} (المجموع {})", gained, total),
            Notice::StageChanged { stage } => {
                println!("== {:?} ({}%) ==", stage, stage.progress_percent());
                println!("🤖 {}", script::assistant_line(*stage));
                if let Some(tip) = script::tip(*stage) {
                    println!("💡 {}", tip);
                }
            }
            Notice::QuizFeedback {
                is_correct,
                correct_option,
            } => {
                if *is_correct {
                    println!("✅ إجابة صحيحة!");
                } else {
                    println!("❌ الإجابة الصحيحة: {}", correct_option + 1);
                }
            }
            Notice::MysteryReply(reply) => {
                println!("📬 رسالة جديدة: {}", reply.subject);
                println!("   {}", reply.body);
            }
        }
    }
}

fn print_status(session: &LessonSession) {
    let state = session.state();
    println!(
        "{:?} | النقاط {} | {}%",
        state.stage(),
        state.score(),
        state.stage().progress_percent()
    );
    if state.stage() == Stage::SpellCheck {
        println!("{}", state.corrections().rendered_text());
        for task in state.corrections().remaining() {
            println!("  fix {}: {} → {}", task.id, task.wrong_form, task.correct_form);
        }
    }
}

fn print_draft(session: &LessonSession) {
    let doc = session.state().document();
    println!("إلى: {}", doc.to());
    println!("نسخة: {}  مخفية: {}", doc.cc(), doc.bcc());
    println!("الموضوع: {}", doc.subject());
    println!("{}", doc.body());
    if doc.has_attachment() {
        println!("[صورة: {:?}]", doc.image_style());
    }
}

fn print_contacts(session: &LessonSession) {
    for contact in session.state().contacts().iter() {
        let star = if contact.is_favorite { "⭐" } else { "  " };
        println!("{} {} <{}> ({})", star, contact.name, contact.email, contact.id);
    }
}

fn print_quiz(session: &LessonSession) {
    let quiz = session.state().quiz();
    match quiz.phase() {
        QuizPhase::Asking { question } => {
            if let Some(q) = quiz.questions().get(question) {
                println!("س{}: {}", question + 1, q.prompt);
                for (i, option) in q.options.iter().enumerate() {
                    println!("  {}. {}", i + 1, option);
                }
            }
        }
        QuizPhase::Result { correct, total } if !quiz.is_claimed() => {
            println!("النتيجة: {} / {}  (claim لاستلام الشهادة)", correct, total);
        }
        _ => {}
    }
}
