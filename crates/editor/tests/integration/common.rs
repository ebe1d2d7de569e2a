use tierline_editor::{EditorConfig, SessionEditor};
use tierline_model::{
	Comment, CommentType, Participant, ParticipantRole, Session, Speaker, TranscriptElement,
};

pub fn session() -> Session {
	let mut session = Session::new("corpus", "s1");
	session.add_participant(Participant::new("CHI", ParticipantRole::TargetChild));
	let mut first = session.new_record(Speaker::participant("CHI"));
	first.tier_mut("Orthography").unwrap().set_text("hi there");
	first.tier_mut("IPA Target").unwrap().set_text("/hi ðɛr/");
	first.tier_mut("Notes").unwrap().set_text("first words");
	let mut second = session.new_record(Speaker::participant("CHI"));
	second.tier_mut("Orthography").unwrap().set_text("bye");
	let transcript = session.transcript_mut();
	transcript.push(TranscriptElement::Record(first));
	transcript.push(TranscriptElement::Comment(Comment::new(CommentType::Situation, "at home")));
	transcript.push(TranscriptElement::Record(second));
	session
}

pub fn editor(session: Session) -> SessionEditor {
	SessionEditor::new(
		session,
		EditorConfig {
			show_syllabification: true,
			..EditorConfig::default()
		},
	)
}

/// Asserts the editor's buffer matches a document rendered from scratch.
pub fn assert_in_sync(editor: &SessionEditor) {
	let mut fresh = SessionEditor::new(editor.session().clone(), editor.config().clone());
	fresh.set_current_element(editor.document().focused());
	assert_eq!(editor.document().text(), fresh.document().text());
	assert_eq!(editor.document().map(), fresh.document().map());
}
