//! Human-readable names for declared frame ids and picture types.

/// Returns the declared name of a frame id, if it is one of the ID3v2.3
/// declared frames (plus a few widespread extensions).
pub fn declared_name(id: &str) -> Option<&'static str> {
    let name = match id {
        "AENC" => "Audio encryption",
        "APIC" => "Attached picture",
        "CHAP" => "Chapter",
        "COMM" => "Comments",
        "COMR" => "Commercial frame",
        "ENCR" => "Encryption method registration",
        "EQUA" => "Equalization",
        "ETCO" => "Event timing codes",
        "GEOB" => "General encapsulated object",
        "GRID" => "Group identification registration",
        "IPLS" => "Involved people list",
        "LINK" => "Linked information",
        "MCDI" => "Music CD identifier",
        "MLLT" => "MPEG location lookup table",
        "OWNE" => "Ownership frame",
        "PCNT" => "Play counter",
        "POPM" => "Popularimeter",
        "POSS" => "Position synchronisation frame",
        "PRIV" => "Private frame",
        "RBUF" => "Recommended buffer size",
        "RVAD" => "Relative volume adjustment",
        "RVRB" => "Reverb",
        "SYLT" => "Synchronized lyric/text",
        "SYTC" => "Synchronized tempo codes",
        "TALB" => "Album/Movie/Show title",
        "TBPM" => "BPM (beats per minute)",
        "TCMP" => "Part of a compilation",
        "TCOM" => "Composer",
        "TCON" => "Content type",
        "TCOP" => "Copyright message",
        "TDAT" => "Date",
        "TDLY" => "Playlist delay",
        "TENC" => "Encoded by",
        "TEXT" => "Lyricist/Text writer",
        "TFLT" => "File type",
        "TIME" => "Time",
        "TIT1" => "Content group description",
        "TIT2" => "Title/songname/content description",
        "TIT3" => "Subtitle/Description refinement",
        "TKEY" => "Initial key",
        "TLAN" => "Language(s)",
        "TLEN" => "Length",
        "TMED" => "Media type",
        "TOAL" => "Original album/movie/show title",
        "TOFN" => "Original filename",
        "TOLY" => "Original lyricist(s)/text writer(s)",
        "TOPE" => "Original artist(s)/performer(s)",
        "TORY" => "Original release year",
        "TOWN" => "File owner/licensee",
        "TPE1" => "Lead performer(s)/Soloist(s)",
        "TPE2" => "Band/orchestra/accompaniment",
        "TPE3" => "Conductor/performer refinement",
        "TPE4" => "Interpreted, remixed, or otherwise modified by",
        "TPOS" => "Part of a set",
        "TPUB" => "Publisher",
        "TRCK" => "Track number/Position in set",
        "TRDA" => "Recording dates",
        "TRSN" => "Internet radio station name",
        "TRSO" => "Internet radio station owner",
        "TSIZ" => "Size",
        "TSRC" => "ISRC (international standard recording code)",
        "TSSE" => "Software/Hardware and settings used for encoding",
        "TXXX" => "User defined text information frame",
        "TYER" => "Year",
        "UFID" => "Unique file identifier",
        "USER" => "Terms of use",
        "USLT" => "Unsynchronized lyric/text transcription",
        "WCOM" => "Commercial information",
        "WCOP" => "Copyright/Legal information",
        "WOAF" => "Official audio file webpage",
        "WOAR" => "Official artist/performer webpage",
        "WOAS" => "Official audio source webpage",
        "WORS" => "Official internet radio station homepage",
        "WPAY" => "Payment",
        "WPUB" => "Publishers official webpage",
        "WXXX" => "User defined URL link frame",
        "XSOA" => "Album sort order",
        "XSOP" => "Performer sort order",
        "XSOT" => "Title sort order",
        _ => return None,
    };
    Some(name)
}

/// Returns the declared name of a frame id, falling back to the id itself.
pub fn display_name(id: &str) -> &str {
    declared_name(id).unwrap_or(id)
}

/// Picture type code of an `APIC` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PictureType {
    Other,
    FileIcon,
    OtherFileIcon,
    FrontCover,
    BackCover,
    Leaflet,
    Media,
    LeadArtist,
    Artist,
    Conductor,
    Band,
    Composer,
    Lyricist,
    RecordingLocation,
    DuringRecording,
    DuringPerformance,
    ScreenCapture,
    BrightColouredFish,
    Illustration,
    BandLogotype,
    PublisherLogotype,
    /// Codes above 0x14 are not declared.
    Undeclared(u8),
}

impl PictureType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => PictureType::Other,
            0x01 => PictureType::FileIcon,
            0x02 => PictureType::OtherFileIcon,
            0x03 => PictureType::FrontCover,
            0x04 => PictureType::BackCover,
            0x05 => PictureType::Leaflet,
            0x06 => PictureType::Media,
            0x07 => PictureType::LeadArtist,
            0x08 => PictureType::Artist,
            0x09 => PictureType::Conductor,
            0x0A => PictureType::Band,
            0x0B => PictureType::Composer,
            0x0C => PictureType::Lyricist,
            0x0D => PictureType::RecordingLocation,
            0x0E => PictureType::DuringRecording,
            0x0F => PictureType::DuringPerformance,
            0x10 => PictureType::ScreenCapture,
            0x11 => PictureType::BrightColouredFish,
            0x12 => PictureType::Illustration,
            0x13 => PictureType::BandLogotype,
            0x14 => PictureType::PublisherLogotype,
            other => PictureType::Undeclared(other),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PictureType::Other => "Other",
            PictureType::FileIcon => "32x32 pixels 'file icon' (PNG only)",
            PictureType::OtherFileIcon => "Other file icon",
            PictureType::FrontCover => "Cover (front)",
            PictureType::BackCover => "Cover (back)",
            PictureType::Leaflet => "Leaflet page",
            PictureType::Media => "Media (e.g. label side of CD)",
            PictureType::LeadArtist => "Lead artist/lead performer/soloist",
            PictureType::Artist => "Artist/performer",
            PictureType::Conductor => "Conductor",
            PictureType::Band => "Band/Orchestra",
            PictureType::Composer => "Composer",
            PictureType::Lyricist => "Lyricist/text writer",
            PictureType::RecordingLocation => "Recording Location",
            PictureType::DuringRecording => "During recording",
            PictureType::DuringPerformance => "During performance",
            PictureType::ScreenCapture => "Movie/video screen capture",
            PictureType::BrightColouredFish => "A bright coloured fish",
            PictureType::Illustration => "Illustration",
            PictureType::BandLogotype => "Band/artist logotype",
            PictureType::PublisherLogotype => "Publisher/Studio logotype",
            PictureType::Undeclared(_) => "Undeclared",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_declared_names() {
        assert_eq!(declared_name("TIT2"), Some("Title/songname/content description"));
        assert_eq!(declared_name("APIC"), Some("Attached picture"));
        assert_eq!(declared_name("ZZZZ"), None);
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(display_name("NCON"), "NCON");
        assert_eq!(display_name("COMM"), "Comments");
    }

    #[test]
    fn picture_type_codes() {
        assert_eq!(PictureType::from_code(3), PictureType::FrontCover);
        assert_eq!(PictureType::from_code(3).description(), "Cover (front)");
        assert_eq!(PictureType::from_code(0x40), PictureType::Undeclared(0x40));
    }
}
