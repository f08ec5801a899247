//! Authored lesson content.
//!
//! All learner-facing text lives here, in the lesson's single authored
//! locale (Arabic).

use crate::stage::Stage;

/// Seed entry for the contact book.
pub struct SeedContact {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub avatar: &'static str,
    pub is_favorite: bool,
}

pub const SEED_CONTACTS: [SeedContact; 2] = [
    SeedContact {
        id: "1",
        name: "أحمد (زميل الدراسة)",
        email: "ahmed@school.com",
        avatar: "https://picsum.photos/seed/ahmed/50/50",
        is_favorite: false,
    },
    SeedContact {
        id: "2",
        name: "الأستاذ أسعد الذهلي",
        email: "asaad4059@moe.om",
        avatar: "https://ui-avatars.com/api/?name=Asaad+Al+Dhahli&background=4F46E5&color=fff",
        is_favorite: true,
    },
];

/// Seed entry for a spelling fix.
pub struct SeedCorrection {
    pub id: u8,
    pub before: &'static str,
    pub wrong: &'static str,
    pub correct: &'static str,
    pub after: &'static str,
}

pub const CORRECTION_TASKS: [SeedCorrection; 9] = [
    SeedCorrection { id: 1, before: "أنا ", wrong: "احب", correct: "أحب", after: " " },
    SeedCorrection { id: 2, before: "", wrong: "وطنني", correct: "وطني", after: " ومعلميني ومدرستي، " },
    SeedCorrection { id: 3, before: "", wrong: "واسعى", correct: "وأسعى", after: " " },
    SeedCorrection { id: 4, before: "", wrong: "دايماً", correct: "دائماً", after: " " },
    SeedCorrection { id: 5, before: "", wrong: "لاكون", correct: "لأكون", after: " " },
    SeedCorrection { id: 6, before: "", wrong: "افضل", correct: "أفضل", after: " " },
    SeedCorrection { id: 7, before: "", wrong: "نسخه", correct: "نسخة", after: " مني، " },
    SeedCorrection { id: 8, before: "", wrong: "وان", correct: "وأن", after: " " },
    SeedCorrection { id: 9, before: "", wrong: "ارضي", correct: "أرضي", after: " ربي وأهلي." },
];

/// Seed entry for a quiz question.
pub struct SeedQuestion {
    pub prompt: &'static str,
    pub options: [&'static str; 3],
    pub correct: usize,
}

pub const QUIZ_QUESTIONS: [SeedQuestion; 5] = [
    SeedQuestion {
        prompt: "ما هو الزر الذي نضغطه للبدء بكتابة رسالة جديدة؟",
        options: ["حذف الرسالة", "بريد جديد (New Mail)", "الإعدادات"],
        correct: 1,
    },
    SeedQuestion {
        prompt: "ماذا يعني الخط الأحمر المتعرج تحت الكلمة؟",
        options: ["الكلمة صحيحة وممتازة", "تنسيق جميل", "يوجد خطأ إملائي يجب تصحيحه"],
        correct: 2,
    },
    SeedQuestion {
        prompt: "لإرسال نسخة مخفية من الرسالة لا يراها الآخرون نستخدم:",
        options: ["To (إلى)", "Cc (نسخة)", "Bcc (نسخة مخفية)"],
        correct: 2,
    },
    SeedQuestion {
        prompt: "وصلتك رسالة من شخص غريب تحتوي على رابط، ماذا تفعل؟",
        options: ["أفتح الرابط فوراً", "لا أفتحها وأخبر والدي أو المعلم", "أرسلها لأصدقائي"],
        correct: 1,
    },
    SeedQuestion {
        prompt: "لإضافة صورة جميلة إلى رسالتك، نذهب إلى تبويب:",
        options: ["إدراج (Insert)", "ملف (File)", "عرض (View)"],
        correct: 0,
    },
];

// Sample message for "load template"
pub const TEMPLATE_TO: &str = "asaad4059@moe.om";
pub const TEMPLATE_SUBJECT: &str = "رسالة عن درس الذكاء الاصطناعي";
pub const TEMPLATE_BODY: &str = "السلام عليكم ورحمة الله، أستاذ أسعد، أشكرك على الدرس القيم، في الحصة الماضية تعلمت عن تطبيقات الذكاء الاصطناعي واستطعت البدأ في محادثة شيقة مع الذكاء الاصطناعي.";

/// Name on the certificate when the student left it empty.
pub const DEFAULT_CERTIFICATE_NAME: &str = "المتعلم الذكي";
/// Addressee of the mystery reply when the student name is empty.
pub const DEFAULT_REPLY_NAME: &str = "صديقي";

pub const INTRO_WARNING: &str =
    "⚠️ تحذير أمني هام: لا تفتح أبداً رسائل أو مرفقات من غرباء لتجنب الفيروسات!";

// Remediation
pub const NEED_NAME: &str = "اكتب اسمك لتبدأ المهمة";
pub const NEED_BASICS: &str = "تأكد من ملء: إلى، الموضوع، والرسالة.";
pub const NEED_SPELLING: &str = "لا تزال هناك أخطاء إملائية (كلمات حمراء). اضغط عليها لتصحيحها.";
pub const NEED_TEXT_FORMAT: &str =
    "أحسنت في تنسيق الصورة! الآن اذهب لتبويب 'تنسيق النص' وغير لون أو شكل الكتابة.";
pub const NEED_IMAGE_FORMAT: &str = "النص جميل! الآن اذهب لتبويب 'إدراج' وأضف صورة.";
pub const NEED_BOTH_FORMATS: &str = "استخدم أدوات التنسيق وإدراج الصور.";
pub const NEED_CONTACT: &str = "أضف جهة اتصال جديدة للحفظ.";
pub const NEED_CC_BCC: &str = "جرب استخدام Cc أو Bcc.";
pub const NEED_QUIZ: &str = "أكمل الاختبار ثم اضغط 'احصل على الشهادة'.";
pub const LESSON_COMPLETE: &str = "لقد أكملت الدرس! يمكنك تحميل شهادتك.";

// Action feedback
pub const PICK_IMAGE_STYLE: &str = "ممتاز! الآن اختر نمطاً للصورة (ظل أو إطار)";

/// Mission brief shown when a stage opens.
pub struct MissionBrief {
    pub title: &'static str,
    pub icon: &'static str,
    pub steps: [&'static str; 4],
}

/// Brief for the stage, if it has one. The quiz and certificate have none.
pub fn mission_brief(stage: Stage) -> Option<&'static MissionBrief> {
    match stage {
        Stage::Basics => Some(&MISSION_BASICS),
        Stage::SpellCheck => Some(&MISSION_SPELL_CHECK),
        Stage::FormattingImages => Some(&MISSION_FORMATTING),
        Stage::ContactsManagement => Some(&MISSION_CONTACTS),
        Stage::AdvancedCcBcc => Some(&MISSION_CC_BCC),
        _ => None,
    }
}

static MISSION_BASICS: MissionBrief = MissionBrief {
    title: "المهمة الأولى: إرسال رسالة",
    icon: "✉️",
    steps: [
        "اضغط على زر نموذج جاهز أو اكتب بنفسك.",
        "تأكد أنك كتبت عنوان المستلم (إلى).",
        "تأكد أنك كتبت عنوان الموضوع.",
        "اضغط زر إرسال.",
    ],
};

static MISSION_SPELL_CHECK: MissionBrief = MissionBrief {
    title: "المهمة الثانية: صائد الأخطاء",
    icon: "🔍",
    steps: [
        "ابحث عن الكلمات التي تحتها خط أحمر متعرج.",
        "اضغط عليها (أو انقر بالزر الأيمن) لتظهر القائمة.",
        "اختر الكلمة الصحيحة.",
        "اضغط زر إرسال بعد تصحيح كل الأخطاء.",
    ],
};

static MISSION_FORMATTING: MissionBrief = MissionBrief {
    title: "المهمة الثالثة: فنان التنسيق",
    icon: "🎨",
    steps: [
        "استخدم أزرار التنسيق (B, I, U) لتغيير شكل النص.",
        "اذهب لتبويب 'إدراج' وأضف صورة.",
        "بعد إضافة الصورة، اذهب لتبويب 'تنسيق الصورة' وأضف لها ظلاً أو إطاراً.",
        "اضغط زر التحقق من التنسيق.",
    ],
};

static MISSION_CONTACTS: MissionBrief = MissionBrief {
    title: "المهمة الرابعة: مدير العلاقات",
    icon: "👥",
    steps: [
        "انتقل إلى شاشة 'الأشخاص' من القائمة الجانبية.",
        "اكتب اسم صديق وبريده الإلكتروني واضغط حفظ.",
        "أضف شخصين على الأقل.",
        "يمكنك تمييز أصدقائك بنجمة المفضلة.",
    ],
};

static MISSION_CC_BCC: MissionBrief = MissionBrief {
    title: "المهمة الخامسة: المحترف",
    icon: "🕶️",
    steps: [
        "تعلم الفرق بين Cc و Bcc.",
        "جرب كتابة بريد إلكتروني في حقل Bcc (النسخة المخفية).",
        "هذا يحافظ على خصوصية أصدقائك.",
        "اضغط إرسال لإنهاء التدريب.",
    ],
};

/// What the on-screen assistant says during a stage.
pub fn assistant_line(stage: Stage) -> &'static str {
    match stage {
        Stage::Basics => "لإنشاء رسالة، نبدأ بـ 'بريد جديد'. املأ حقل 'إلى' للمستلم، وحقل 'الموضوع' لعنوان مختصر، ثم اكتب رسالتك. تذكر: الوضوح مهم!",
        Stage::SpellCheck => "الخط الأحمر المموج يعني وجود خطأ إملائي. انقر عليه بزر الفأرة الأيمن لتصحيحه. الرسالة الخالية من الأخطاء تعكس احترامك للمستلم.",
        Stage::FormattingImages => "اجعل رسالتك جذابة! استخدم تبويب 'تنسيق' لتغيير الخط، و'إدراج' لإضافة صور. يمكنك تعديل الصور (قص، ظل) من 'تنسيق الصورة'.",
        Stage::ContactsManagement => "بدلاً من كتابة العناوين كل مرة، احفظ أصدقاءك في 'الأشخاص' (Contacts). يمكنك إضافتهم للمفضلة للوصول السريع.",
        Stage::AdvancedCcBcc => "استخدم (Cc) للشفافية (الكل يرى المستلمين)، و(Bcc) للخصوصية (لا أحد يرى القائمة). احذر من رسائل الغرباء!",
        Stage::Quiz => "الآن حان وقت التحدي! أجب عن الأسئلة لتحصل على الشهادة.",
        _ => "أنت تبلي بلاءً حسناً!",
    }
}

/// "Did you know?" tip for a stage.
pub fn tip(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Basics => Some("الموضوع الجيد (Subject) يساعد المستلم على فهم محتوى الرسالة قبل فتحها."),
        Stage::SpellCheck => Some("التدقيق الإملائي ليس مجرد تصحيح، بل هو احترام لوقت القارئ."),
        Stage::FormattingImages => Some("يمكنك إدراج صور متعددة بالضغط على زر Ctrl أثناء الاختيار."),
        Stage::ContactsManagement => Some("زر 'الأشخاص' يتيح لك تنظيم دفتر العناوين وإضافة الأصدقاء للمفضلة."),
        Stage::AdvancedCcBcc => Some("الفرق الجوهري: Bcc تحافظ على خصوصية المستلمين، بينما Cc تجعل الجميع يرى بعضهم."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_briefs_cover_working_stages() {
        let with_brief: Vec<Stage> = Stage::ALL
            .iter()
            .copied()
            .filter(|s| mission_brief(*s).is_some())
            .collect();
        assert_eq!(
            with_brief,
            vec![
                Stage::Basics,
                Stage::SpellCheck,
                Stage::FormattingImages,
                Stage::ContactsManagement,
                Stage::AdvancedCcBcc,
            ]
        );
    }

    #[test]
    fn test_quiz_answers_in_range() {
        for q in &QUIZ_QUESTIONS {
            assert!(q.correct < q.options.len());
        }
    }
}
