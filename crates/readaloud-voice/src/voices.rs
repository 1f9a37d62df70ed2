//! Voice listings for process engines.

use readaloud_core::VoiceInfo;

/// Parse `espeak-ng --voices` output.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
///  5  en-us           --/M      English_(America)  gmw/en-US            (en 3)
/// ```
///
/// The language column is the identifier `-v` accepts.
pub fn parse_espeak_voices(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let _priority = columns.next()?;
            let language = columns.next()?;
            let _age_gender = columns.next()?;
            let name = columns.next()?;
            Some(VoiceInfo {
                id: language.to_owned(),
                name: name.replace('_', " "),
                language: Some(language.to_owned()),
            })
        })
        .collect()
}

/// Parse `say -v '?'` output.
///
/// ```text
/// Alex                en_US    # Most people recognize me by my voice.
/// Bad News            en_US    # The light you see at the end of the tunnel...
/// ```
///
/// Names may contain spaces; the locale is the last column before `#`.
pub fn parse_say_voices(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .filter_map(|line| {
            let columns = line.split('#').next()?.trim_end();
            let (name, locale) = columns.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(VoiceInfo {
                id: name.to_owned(),
                name: name.to_owned(),
                language: Some(locale.replace('_', "-")),
            })
        })
        .collect()
}
