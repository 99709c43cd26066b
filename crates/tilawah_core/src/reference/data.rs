//! Built-in reference tables: 114 chapters and the 30 parts they are grouped into.
//!
//! Parts are stored as their first verse and declared verse count. Each part ends
//! one verse before the next begins, and the last part ends at the final verse of
//! chapter 114; the declared counts are checked against those boundaries.

/// Declared number of verses in the reference corpus.
pub const TOTAL_VERSES: usize = 6236;

/// `(latin name, arabic name, verse count)`.
pub type ChapterRow = (&'static str, &'static str, u16);

/// `(latin name, arabic name, (first chapter, first verse), verse count)`.
pub type PartRow = (&'static str, &'static str, (u16, u16), usize);

/// Chapters 1..=114.
pub const CHAPTERS: [ChapterRow; 114] = [
    ("Al-Fatihah", "الفاتحة", 7), // 1
    ("Al-Baqarah", "البقرة", 286), // 2
    ("Ali 'Imran", "آل عمران", 200), // 3
    ("An-Nisa", "النساء", 176), // 4
    ("Al-Ma'idah", "المائدة", 120), // 5
    ("Al-An'am", "الأنعام", 165), // 6
    ("Al-A'raf", "الأعراف", 206), // 7
    ("Al-Anfal", "الأنفال", 75), // 8
    ("At-Tawbah", "التوبة", 129), // 9
    ("Yunus", "يونس", 109), // 10
    ("Hud", "هود", 123), // 11
    ("Yusuf", "يوسف", 111), // 12
    ("Ar-Ra'd", "الرعد", 43), // 13
    ("Ibrahim", "إبراهيم", 52), // 14
    ("Al-Hijr", "الحجر", 99), // 15
    ("An-Nahl", "النحل", 128), // 16
    ("Al-Isra", "الإسراء", 111), // 17
    ("Al-Kahf", "الكهف", 110), // 18
    ("Maryam", "مريم", 98), // 19
    ("Taha", "طه", 135), // 20
    ("Al-Anbya", "الأنبياء", 112), // 21
    ("Al-Hajj", "الحج", 78), // 22
    ("Al-Mu'minun", "المؤمنون", 118), // 23
    ("An-Nur", "النور", 64), // 24
    ("Al-Furqan", "الفرقان", 77), // 25
    ("Ash-Shu'ara", "الشعراء", 227), // 26
    ("An-Naml", "النمل", 93), // 27
    ("Al-Qasas", "القصص", 88), // 28
    ("Al-'Ankabut", "العنكبوت", 69), // 29
    ("Ar-Rum", "الروم", 60), // 30
    ("Luqman", "لقمان", 34), // 31
    ("As-Sajdah", "السجدة", 30), // 32
    ("Al-Ahzab", "الأحزاب", 73), // 33
    ("Saba", "سبأ", 54), // 34
    ("Fatir", "فاطر", 45), // 35
    ("Ya-Sin", "يس", 83), // 36
    ("As-Saffat", "الصافات", 182), // 37
    ("Sad", "ص", 88), // 38
    ("Az-Zumar", "الزمر", 75), // 39
    ("Ghafir", "غافر", 85), // 40
    ("Fussilat", "فصلت", 54), // 41
    ("Ash-Shuraa", "الشورى", 53), // 42
    ("Az-Zukhruf", "الزخرف", 89), // 43
    ("Ad-Dukhan", "الدخان", 59), // 44
    ("Al-Jathiyah", "الجاثية", 37), // 45
    ("Al-Ahqaf", "الأحقاف", 35), // 46
    ("Muhammad", "محمد", 38), // 47
    ("Al-Fath", "الفتح", 29), // 48
    ("Al-Hujurat", "الحجرات", 18), // 49
    ("Qaf", "ق", 45), // 50
    ("Adh-Dhariyat", "الذاريات", 60), // 51
    ("At-Tur", "الطور", 49), // 52
    ("An-Najm", "النجم", 62), // 53
    ("Al-Qamar", "القمر", 55), // 54
    ("Ar-Rahman", "الرحمن", 78), // 55
    ("Al-Waqi'ah", "الواقعة", 96), // 56
    ("Al-Hadid", "الحديد", 29), // 57
    ("Al-Mujadila", "المجادلة", 22), // 58
    ("Al-Hashr", "الحشر", 24), // 59
    ("Al-Mumtahanah", "الممتحنة", 13), // 60
    ("As-Saf", "الصف", 14), // 61
    ("Al-Jumu'ah", "الجمعة", 11), // 62
    ("Al-Munafiqun", "المنافقون", 11), // 63
    ("At-Taghabun", "التغابن", 18), // 64
    ("At-Talaq", "الطلاق", 12), // 65
    ("At-Tahrim", "التحريم", 12), // 66
    ("Al-Mulk", "الملك", 30), // 67
    ("Al-Qalam", "القلم", 52), // 68
    ("Al-Haqqah", "الحاقة", 52), // 69
    ("Al-Ma'arij", "المعارج", 44), // 70
    ("Nuh", "نوح", 28), // 71
    ("Al-Jinn", "الجن", 28), // 72
    ("Al-Muzzammil", "المزمل", 20), // 73
    ("Al-Muddaththir", "المدثر", 56), // 74
    ("Al-Qiyamah", "القيامة", 40), // 75
    ("Al-Insan", "الإنسان", 31), // 76
    ("Al-Mursalat", "المرسلات", 50), // 77
    ("An-Naba", "النبأ", 40), // 78
    ("An-Nazi'at", "النازعات", 46), // 79
    ("'Abasa", "عبس", 42), // 80
    ("At-Takwir", "التكوير", 29), // 81
    ("Al-Infitar", "الانفطار", 19), // 82
    ("Al-Mutaffifin", "المطففين", 36), // 83
    ("Al-Inshiqaq", "الانشقاق", 25), // 84
    ("Al-Buruj", "البروج", 22), // 85
    ("At-Tariq", "الطارق", 17), // 86
    ("Al-A'la", "الأعلى", 19), // 87
    ("Al-Ghashiyah", "الغاشية", 26), // 88
    ("Al-Fajr", "الفجر", 30), // 89
    ("Al-Balad", "البلد", 20), // 90
    ("Ash-Shams", "الشمس", 15), // 91
    ("Al-Layl", "الليل", 21), // 92
    ("Ad-Duhaa", "الضحى", 11), // 93
    ("Ash-Sharh", "الشرح", 8), // 94
    ("At-Tin", "التين", 8), // 95
    ("Al-'Alaq", "العلق", 19), // 96
    ("Al-Qadr", "القدر", 5), // 97
    ("Al-Bayyinah", "البينة", 8), // 98
    ("Az-Zalzalah", "الزلزلة", 8), // 99
    ("Al-'Adiyat", "العاديات", 11), // 100
    ("Al-Qari'ah", "القارعة", 11), // 101
    ("At-Takathur", "التكاثر", 8), // 102
    ("Al-'Asr", "العصر", 3), // 103
    ("Al-Humazah", "الهمزة", 9), // 104
    ("Al-Fil", "الفيل", 5), // 105
    ("Quraysh", "قريش", 4), // 106
    ("Al-Ma'un", "الماعون", 7), // 107
    ("Al-Kawthar", "الكوثر", 3), // 108
    ("Al-Kafirun", "الكافرون", 6), // 109
    ("An-Nasr", "النصر", 3), // 110
    ("Al-Masad", "المسد", 5), // 111
    ("Al-Ikhlas", "الإخلاص", 4), // 112
    ("Al-Falaq", "الفلق", 5), // 113
    ("An-Nas", "الناس", 6), // 114
];

/// `(latin name, arabic name, (chapter, verse) of the first verse)` for parts 1..=30.
pub const PARTS: [PartRow; 30] = [
    ("Alif Lam Mim", "الم", (1, 1), 148), // 1
    ("Sayaqul", "سيقول", (2, 142), 111), // 2
    ("Tilka ar-Rusul", "تلك الرسل", (2, 253), 126), // 3
    ("Lan Tanalu", "لن تنالوا", (3, 93), 131), // 4
    ("Wal-Muhsanat", "والمحصنات", (4, 24), 124), // 5
    ("La Yuhibbullah", "لا يحب الله", (4, 148), 110), // 6
    ("Wa Idha Sami'u", "وإذا سمعوا", (5, 82), 149), // 7
    ("Wa Law Annana", "ولو أننا", (6, 111), 142), // 8
    ("Qal al-Mala'", "قال الملأ", (7, 88), 159), // 9
    ("Wa'lamu", "واعلموا", (8, 41), 127), // 10
    ("Ya'tadhirun", "يعتذرون", (9, 93), 151), // 11
    ("Wa Ma Min Dabbah", "وما من دابة", (11, 6), 170), // 12
    ("Wa Ma Ubarri'u", "وما أبرئ", (12, 53), 154), // 13
    ("Rubama", "ربما", (15, 1), 227), // 14
    ("Subhan alladhi", "سبحان الذي", (17, 1), 185), // 15
    ("Qal Alam", "قال ألم", (18, 75), 269), // 16
    ("Iqtaraba", "اقترب", (21, 1), 190), // 17
    ("Qad Aflaha", "قد أفلح", (23, 1), 202), // 18
    ("Wa Qal alladhina", "وقال الذين", (25, 21), 339), // 19
    ("Amman Khalaq", "أمن خلق", (27, 56), 171), // 20
    ("Utlu Ma Uhiya", "اتل ما أوحي", (29, 46), 178), // 21
    ("Wa Man Yaqnut", "ومن يقنت", (33, 31), 169), // 22
    ("Wa Maliya", "وما لي", (36, 28), 357), // 23
    ("Fa Man Azlam", "فمن أظلم", (39, 32), 175), // 24
    ("Ilayhi Yuraddu", "إليه يرد", (41, 47), 246), // 25
    ("Ha Mim", "حم", (46, 1), 195), // 26
    ("Qala Fa Ma Khatbukum", "قال فما خطبكم", (51, 31), 399), // 27
    ("Qad Sami'a Allah", "قد سمع الله", (58, 1), 137), // 28
    ("Tabarak alladhi", "تبارك الذي", (67, 1), 431), // 29
    ("'Amma", "عم", (78, 1), 564), // 30
];
