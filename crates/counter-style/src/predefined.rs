//! The predefined counter styles from CSS Counter Styles Level 3.
//!
//! [`install`] populates a registry with every style listed in §3 of the
//! module docs below. Symbol tables are transcribed from the spec's
//! `@counter-style` definitions; the four Chinese styles use the limited
//! positional algorithm instead of a table.
//!
//! Fallback wiring: CJK and Chinese styles fall back to `cjk-decimal`,
//! which falls back to `decimal`; everything else falls back straight to
//! `decimal`.

use std::rc::Rc;

use crate::registry::StyleRegistry;
use crate::style::{Negative, Pad, Style, StyleOptions};
use crate::system::{ChineseSet, System};

fn chars(s: &str) -> Vec<String> {
    s.chars().map(|c| c.to_string()).collect()
}

fn additive(pairs: &[(i32, &str)]) -> System {
    System::Additive {
        symbols: pairs.iter().map(|(w, s)| (*w, (*s).to_string())).collect(),
    }
}

fn negative(prefix: &str) -> Option<Negative> {
    Some(Negative { prefix: prefix.to_string(), suffix: String::new() })
}

struct Installer<'a> {
    registry: &'a mut StyleRegistry,
    decimal: Rc<Style>,
}

impl Installer<'_> {
    fn add(
        &mut self,
        name: &str,
        system: System,
        negative: Option<Negative>,
        range: Option<(i32, i32)>,
        pad: Option<Pad>,
        fallback: Rc<Style>,
    ) -> Rc<Style> {
        let style = Style::create(StyleOptions { system, negative, range, pad, fallback })
            .unwrap_or_else(|e| panic!("predefined style {name:?} failed to build: {e}"));
        self.registry.register(name, Rc::clone(&style));
        style
    }

    fn numeric(&mut self, name: &str, digits: &str) {
        let fallback = Rc::clone(&self.decimal);
        self.add(name, System::Numeric { symbols: chars(digits) }, None, None, None, fallback);
    }

    fn alphabetic(&mut self, name: &str, symbols: &str) {
        let fallback = Rc::clone(&self.decimal);
        self.add(name, System::Alphabetic { symbols: chars(symbols) }, None, None, None, fallback);
    }

    fn cyclic(&mut self, name: &str, symbol: &str) {
        let fallback = Rc::clone(&self.decimal);
        self.add(
            name,
            System::Cyclic { symbols: vec![symbol.to_string()] },
            None,
            None,
            None,
            fallback,
        );
    }
}

/// Install the predefined style set into `registry`. The registry's
/// default decimal style is reused as the terminal fallback.
pub fn install(registry: &mut StyleRegistry) {
    let decimal = Rc::clone(registry.decimal());
    let mut i = Installer { registry, decimal };

    // --- numeric -----------------------------------------------------------
    i.add(
        "decimal-leading-zero",
        System::Numeric { symbols: chars("0123456789") },
        None,
        None,
        Some(Pad { min_len: 2, symbol: "0".to_string() }),
        Rc::clone(&i.decimal),
    );
    i.numeric("arabic-indic", "٠١٢٣٤٥٦٧٨٩");
    i.numeric("persian", "۰۱۲۳۴۵۶۷۸۹");
    i.numeric("bengali", "০১২৩৪৫৬৭৮৯");
    i.numeric("devanagari", "०१२३४५६७८९");
    i.numeric("gujarati", "૦૧૨૩૪૫૬૭૮૯");
    i.numeric("gurmukhi", "੦੧੨੩੪੫੬੭੮੯");
    i.numeric("kannada", "೦೧೨೩೪೫೬೭೮೯");
    i.numeric("khmer", "០១២៣៤៥៦៧៨៩");
    i.numeric("cambodian", "០១២៣៤៥៦៧៨៩");
    i.numeric("lao", "໐໑໒໓໔໕໖໗໘໙");
    i.numeric("malayalam", "൦൧൨൩൪൫൬൭൮൯");
    i.numeric("mongolian", "᠐᠑᠒᠓᠔᠕᠖᠗᠘᠙");
    i.numeric("myanmar", "၀၁၂၃၄၅၆၇၈၉");
    i.numeric("oriya", "୦୧୨୩୪୫୬୭୮୯");
    i.numeric("tamil", "௦௧௨௩௪௫௬௭௮௯");
    i.numeric("telugu", "౦౧౨౩౪౫౬౭౮౯");
    i.numeric("thai", "๐๑๒๓๔๕๖๗๘๙");
    i.numeric("tibetan", "༠༡༢༣༤༥༦༧༨༩");

    let cjk_decimal = i.add(
        "cjk-decimal",
        System::Numeric { symbols: chars("〇一二三四五六七八九") },
        None,
        Some((0, i32::MAX)),
        None,
        Rc::clone(&i.decimal),
    );

    // --- alphabetic --------------------------------------------------------
    let latin_lower = "abcdefghijklmnopqrstuvwxyz";
    let latin_upper = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    i.alphabetic("lower-alpha", latin_lower);
    i.alphabetic("lower-latin", latin_lower);
    i.alphabetic("upper-alpha", latin_upper);
    i.alphabetic("upper-latin", latin_upper);
    i.alphabetic("lower-greek", "αβγδεζηθικλμνξοπρστυφχψω");
    i.alphabetic(
        "hiragana",
        "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわゐゑをん",
    );
    i.alphabetic(
        "hiragana-iroha",
        "いろはにほへとちりぬるをわかよたれそつねならむうゐのおくやまけふこえてあさきゆめみしゑひもせす",
    );
    i.alphabetic(
        "katakana",
        "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヰヱヲン",
    );
    i.alphabetic(
        "katakana-iroha",
        "イロハニホヘトチリヌルヲワカヨタレソツネナラムウヰノオクヤマケフコエテアサキユメミシヱヒモセス",
    );

    // --- additive ----------------------------------------------------------
    let roman: &[(i32, &str)] = &[
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let lower_roman: Vec<(i32, String)> = roman
        .iter()
        .map(|(w, s)| (*w, s.to_lowercase()))
        .collect();
    i.add(
        "upper-roman",
        additive(roman),
        None,
        Some((1, 3999)),
        None,
        Rc::clone(&i.decimal),
    );
    i.add(
        "lower-roman",
        System::Additive { symbols: lower_roman },
        None,
        Some((1, 3999)),
        None,
        Rc::clone(&i.decimal),
    );

    let armenian: &[(i32, &str)] = &[
        (9000, "Ք"), (8000, "Փ"), (7000, "Ւ"), (6000, "Ց"), (5000, "Ր"),
        (4000, "Տ"), (3000, "Վ"), (2000, "Ս"), (1000, "Ռ"),
        (900, "Ջ"), (800, "Պ"), (700, "Չ"), (600, "Ո"), (500, "Շ"),
        (400, "Ն"), (300, "Յ"), (200, "Մ"), (100, "Ճ"),
        (90, "Ղ"), (80, "Ձ"), (70, "Հ"), (60, "Կ"), (50, "Ծ"),
        (40, "Խ"), (30, "Լ"), (20, "Ի"), (10, "Ժ"),
        (9, "Թ"), (8, "Ը"), (7, "Է"), (6, "Զ"), (5, "Ե"),
        (4, "Դ"), (3, "Գ"), (2, "Բ"), (1, "Ա"),
    ];
    let lower_armenian: &[(i32, &str)] = &[
        (9000, "ք"), (8000, "փ"), (7000, "ւ"), (6000, "ց"), (5000, "ր"),
        (4000, "տ"), (3000, "վ"), (2000, "ս"), (1000, "ռ"),
        (900, "ջ"), (800, "պ"), (700, "չ"), (600, "ո"), (500, "շ"),
        (400, "ն"), (300, "յ"), (200, "մ"), (100, "ճ"),
        (90, "ղ"), (80, "ձ"), (70, "հ"), (60, "կ"), (50, "ծ"),
        (40, "խ"), (30, "լ"), (20, "ի"), (10, "ժ"),
        (9, "թ"), (8, "ը"), (7, "է"), (6, "զ"), (5, "ե"),
        (4, "դ"), (3, "գ"), (2, "բ"), (1, "ա"),
    ];
    i.add("armenian", additive(armenian), None, Some((1, 9999)), None, Rc::clone(&i.decimal));
    i.add("upper-armenian", additive(armenian), None, Some((1, 9999)), None, Rc::clone(&i.decimal));
    i.add("lower-armenian", additive(lower_armenian), None, Some((1, 9999)), None, Rc::clone(&i.decimal));

    let hebrew: &[(i32, &str)] = &[
        (10000, "י׳"), (9000, "ט׳"), (8000, "ח׳"), (7000, "ז׳"), (6000, "ו׳"),
        (5000, "ה׳"), (4000, "ד׳"), (3000, "ג׳"), (2000, "ב׳"), (1000, "א׳"),
        (400, "ת"), (300, "ש"), (200, "ר"), (100, "ק"),
        (90, "צ"), (80, "פ"), (70, "ע"), (60, "ס"), (50, "נ"),
        (40, "מ"), (30, "ל"), (20, "כ"),
        (19, "יט"), (18, "יח"), (17, "יז"), (16, "טז"), (15, "טו"),
        (10, "י"), (9, "ט"), (8, "ח"), (7, "ז"), (6, "ו"),
        (5, "ה"), (4, "ד"), (3, "ג"), (2, "ב"), (1, "א"),
    ];
    i.add("hebrew", additive(hebrew), None, Some((1, 10999)), None, Rc::clone(&i.decimal));

    let georgian: &[(i32, &str)] = &[
        (10000, "ჵ"), (9000, "ჰ"), (8000, "ჯ"), (7000, "ჴ"), (6000, "ხ"),
        (5000, "ჭ"), (4000, "წ"), (3000, "ძ"), (2000, "ც"), (1000, "ჩ"),
        (900, "შ"), (800, "ყ"), (700, "ღ"), (600, "ქ"), (500, "ფ"),
        (400, "ჳ"), (300, "ტ"), (200, "ს"), (100, "რ"),
        (90, "ჟ"), (80, "პ"), (70, "ო"), (60, "ჲ"), (50, "ნ"),
        (40, "მ"), (30, "ლ"), (20, "კ"), (10, "ი"),
        (9, "თ"), (8, "ჱ"), (7, "ზ"), (6, "ვ"), (5, "ე"),
        (4, "დ"), (3, "გ"), (2, "ბ"), (1, "ა"),
    ];
    i.add("georgian", additive(georgian), None, Some((1, 19999)), None, Rc::clone(&i.decimal));

    let japanese_informal: &[(i32, &str)] = &[
        (9000, "九千"), (8000, "八千"), (7000, "七千"), (6000, "六千"), (5000, "五千"),
        (4000, "四千"), (3000, "三千"), (2000, "二千"), (1000, "千"),
        (900, "九百"), (800, "八百"), (700, "七百"), (600, "六百"), (500, "五百"),
        (400, "四百"), (300, "三百"), (200, "二百"), (100, "百"),
        (90, "九十"), (80, "八十"), (70, "七十"), (60, "六十"), (50, "五十"),
        (40, "四十"), (30, "三十"), (20, "二十"), (10, "十"),
        (9, "九"), (8, "八"), (7, "七"), (6, "六"), (5, "五"),
        (4, "四"), (3, "三"), (2, "二"), (1, "一"), (0, "〇"),
    ];
    let japanese_formal: &[(i32, &str)] = &[
        (9000, "九阡"), (8000, "八阡"), (7000, "七阡"), (6000, "六阡"), (5000, "五阡"),
        (4000, "四阡"), (3000, "参阡"), (2000, "弐阡"), (1000, "壱阡"),
        (900, "九百"), (800, "八百"), (700, "七百"), (600, "六百"), (500, "五百"),
        (400, "四百"), (300, "参百"), (200, "弐百"), (100, "壱百"),
        (90, "九拾"), (80, "八拾"), (70, "七拾"), (60, "六拾"), (50, "五拾"),
        (40, "四拾"), (30, "参拾"), (20, "弐拾"), (10, "壱拾"),
        (9, "九"), (8, "八"), (7, "七"), (6, "六"), (5, "五"),
        (4, "四"), (3, "参"), (2, "弐"), (1, "壱"), (0, "零"),
    ];
    i.add(
        "japanese-informal",
        additive(japanese_informal),
        negative("マイナス"),
        Some((-9999, 9999)),
        None,
        Rc::clone(&cjk_decimal),
    );
    i.add(
        "japanese-formal",
        additive(japanese_formal),
        negative("マイナス"),
        Some((-9999, 9999)),
        None,
        Rc::clone(&cjk_decimal),
    );

    let korean_hangul_formal: &[(i32, &str)] = &[
        (9000, "구천"), (8000, "팔천"), (7000, "칠천"), (6000, "육천"), (5000, "오천"),
        (4000, "사천"), (3000, "삼천"), (2000, "이천"), (1000, "일천"),
        (900, "구백"), (800, "팔백"), (700, "칠백"), (600, "육백"), (500, "오백"),
        (400, "사백"), (300, "삼백"), (200, "이백"), (100, "일백"),
        (90, "구십"), (80, "팔십"), (70, "칠십"), (60, "육십"), (50, "오십"),
        (40, "사십"), (30, "삼십"), (20, "이십"), (10, "일십"),
        (9, "구"), (8, "팔"), (7, "칠"), (6, "육"), (5, "오"),
        (4, "사"), (3, "삼"), (2, "이"), (1, "일"), (0, "영"),
    ];
    let korean_hanja_informal: &[(i32, &str)] = &[
        (9000, "九千"), (8000, "八千"), (7000, "七千"), (6000, "六千"), (5000, "五千"),
        (4000, "四千"), (3000, "三千"), (2000, "二千"), (1000, "千"),
        (900, "九百"), (800, "八百"), (700, "七百"), (600, "六百"), (500, "五百"),
        (400, "四百"), (300, "三百"), (200, "二百"), (100, "百"),
        (90, "九十"), (80, "八十"), (70, "七十"), (60, "六十"), (50, "五十"),
        (40, "四十"), (30, "三十"), (20, "二十"), (10, "十"),
        (9, "九"), (8, "八"), (7, "七"), (6, "六"), (5, "五"),
        (4, "四"), (3, "三"), (2, "二"), (1, "一"), (0, "零"),
    ];
    let korean_hanja_formal: &[(i32, &str)] = &[
        (9000, "九仟"), (8000, "八仟"), (7000, "七仟"), (6000, "六仟"), (5000, "五仟"),
        (4000, "四仟"), (3000, "參仟"), (2000, "貳仟"), (1000, "壹仟"),
        (900, "九百"), (800, "八百"), (700, "七百"), (600, "六百"), (500, "五百"),
        (400, "四百"), (300, "參百"), (200, "貳百"), (100, "壹百"),
        (90, "九拾"), (80, "八拾"), (70, "七拾"), (60, "六拾"), (50, "五拾"),
        (40, "四拾"), (30, "參拾"), (20, "貳拾"), (10, "壹拾"),
        (9, "九"), (8, "八"), (7, "七"), (6, "六"), (5, "五"),
        (4, "四"), (3, "參"), (2, "貳"), (1, "壹"), (0, "零"),
    ];
    i.add(
        "korean-hangul-formal",
        additive(korean_hangul_formal),
        negative("마이너스 "),
        Some((-9999, 9999)),
        None,
        Rc::clone(&cjk_decimal),
    );
    i.add(
        "korean-hanja-informal",
        additive(korean_hanja_informal),
        negative("마이너스 "),
        Some((-9999, 9999)),
        None,
        Rc::clone(&cjk_decimal),
    );
    i.add(
        "korean-hanja-formal",
        additive(korean_hanja_formal),
        negative("마이너스 "),
        Some((-9999, 9999)),
        None,
        Rc::clone(&cjk_decimal),
    );

    // --- chinese -----------------------------------------------------------
    let simp_digits = ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'];
    let simp_financial = ['零', '壹', '贰', '叁', '肆', '伍', '陆', '柒', '捌', '玖'];
    let trad_digits = ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'];
    let trad_financial = ['零', '壹', '貳', '參', '肆', '伍', '陸', '柒', '捌', '玖'];
    let chinese = |digits: [char; 10], tens, hundreds, thousands, informal| {
        System::Chinese(ChineseSet { digits, tens, hundreds, thousands, informal })
    };
    i.add(
        "simp-chinese-informal",
        chinese(simp_digits, '十', '百', '千', true),
        negative("负"),
        None,
        None,
        Rc::clone(&cjk_decimal),
    );
    i.add(
        "simp-chinese-formal",
        chinese(simp_financial, '拾', '佰', '仟', false),
        negative("负"),
        None,
        None,
        Rc::clone(&cjk_decimal),
    );
    i.add(
        "trad-chinese-informal",
        chinese(trad_digits, '十', '百', '千', true),
        negative("負"),
        None,
        None,
        Rc::clone(&cjk_decimal),
    );
    i.add(
        "trad-chinese-formal",
        chinese(trad_financial, '拾', '佰', '仟', false),
        negative("負"),
        None,
        None,
        Rc::clone(&cjk_decimal),
    );

    // --- ethiopic ----------------------------------------------------------
    i.add("ethiopic-numeric", System::Ethiopic, None, None, None, Rc::clone(&i.decimal));

    // --- cyclic bullets ----------------------------------------------------
    i.cyclic("disc", "•");
    i.cyclic("circle", "◦");
    i.cyclic("square", "▪");

    // --- fixed -------------------------------------------------------------
    i.add(
        "cjk-heavenly-stem",
        System::Fixed { first: 1, symbols: chars("甲乙丙丁戊己庚辛壬癸") },
        None,
        None,
        None,
        Rc::clone(&cjk_decimal),
    );
    i.add(
        "cjk-earthly-branch",
        System::Fixed { first: 1, symbols: chars("子丑寅卯辰巳午未申酉戌亥") },
        None,
        None,
        None,
        Rc::clone(&cjk_decimal),
    );
}
