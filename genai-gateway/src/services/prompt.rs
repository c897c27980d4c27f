//! Prompt templates.
//!
//! Every prompt is wrapped in the conversational role markers the Anthropic
//! text models require: it opens with `\n\nHuman:` and ends with
//! `\n\nAssistant:` so the model answers next.

pub const HUMAN_MARKER: &str = "\n\nHuman:";
pub const ASSISTANT_MARKER: &str = "\n\nAssistant:";

const RAG_INSTRUCTION: &str = "[参考]情報をもとに[質問]に適切に答えてください。";

const IMAGE_PROMPT_INSTRUCTION: &str = r#"あなたはStable Diffusionのプロンプトを生成するAIアシスタントです。
以下の step でStableDiffusionのプロンプトを生成してください。

<step>
* rule を理解してください。ルールは必ず守ってください。例外はありません。
* ユーザは生成して欲しい画像の要件をチャットで指示します。チャットのやり取りを全て理解してください。
* チャットのやり取りから、生成して欲しい画像の特徴を正しく認識してください。
* 画像生成において重要な要素をから順にプロンプトに出力してください。ルールで指定された文言以外は一切出力してはいけません。例外はありません。
</step>

<rule>
* プロンプトは output-format の通りに、JSON形式で出力してください。JSON以外の文字列は一切出力しないでください。JSONの前にも後にも出力禁止です。
* JSON形式以外の文言を出力することは一切禁止されています。挨拶、雑談、ルールの説明など一切禁止です。
* プロンプトは単語単位で、カンマ区切りで出力してください。長文で出力しないでください。プロンプトは必ず英語で出力してください。
* プロンプトには以下の要素を含めてください。
 * 画像のクオリティ、被写体の情報、衣装・ヘアスタイル・表情・アクセサリーなどの情報、画風に関する情報、背景に関する情報、構図に関する情報、ライティングやフィルタに関する情報
* 画像に含めたくない要素については、negativePromptとして出力してください。なお、negativePromptは必ず出力してください。
* フィルタリング対象になる不適切な要素は出力しないでください。
</rule>

<output-format>
{
  prompt: string,
  negativePrompt: string,
}
</output-format>"#;

/// Build the retrieval-augmented prompt: instruction, question, then the
/// excerpts as a compact JSON list.
pub fn rag_prompt(question: &str, excerpts: &[String]) -> String {
    // Serializing a slice of strings cannot fail.
    let references = serde_json::to_string(excerpts).unwrap_or_else(|_| "[]".to_string());

    format!(
        "{HUMAN_MARKER}\n{RAG_INSTRUCTION}\n[質問]\n{question}\n[参考]\n{references}{ASSISTANT_MARKER}\n"
    )
}

/// Build the prompt asking a text model to write a Stable Diffusion prompt
/// (JSON `{prompt, negativePrompt}`) for the requested image.
pub fn image_prompt(request: &str) -> String {
    format!("{HUMAN_MARKER} {request}\n\n{IMAGE_PROMPT_INSTRUCTION}{ASSISTANT_MARKER}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excerpts() -> Vec<String> {
        vec![
            "Returns accepted within 30 days.".to_string(),
            "返品は未開封に限ります。".to_string(),
        ]
    }

    #[test]
    fn rag_prompt_is_deterministic() {
        let first = rag_prompt("What is the return policy?", &excerpts());
        let second = rag_prompt("What is the return policy?", &excerpts());
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn rag_prompt_has_role_markers_in_order() {
        let prompt = rag_prompt("What is the return policy?", &excerpts());
        assert!(prompt.starts_with(HUMAN_MARKER));
        let assistant = prompt.rfind(ASSISTANT_MARKER).unwrap();
        assert!(assistant > prompt.find("[参考]\n").unwrap());
        assert_eq!(prompt[assistant..].trim_end(), ASSISTANT_MARKER.trim_end());
    }

    #[test]
    fn rag_prompt_embeds_question_and_excerpt_list() {
        let prompt = rag_prompt("What is the return policy?", &excerpts());
        assert!(prompt.contains("[質問]\nWhat is the return policy?\n"));
        assert!(prompt.contains(
            r#"["Returns accepted within 30 days.","返品は未開封に限ります。"]"#
        ));
    }

    #[test]
    fn rag_prompt_with_no_excerpts_has_empty_list() {
        let prompt = rag_prompt("question", &[]);
        assert!(prompt.contains("[参考]\n[]"));
    }

    #[test]
    fn image_prompt_wraps_request() {
        let prompt = image_prompt("ラーメンを食べる猫");
        assert!(prompt.starts_with("\n\nHuman: ラーメンを食べる猫\n"));
        assert!(prompt.contains("negativePrompt: string"));
        assert!(prompt.ends_with("\n\nAssistant:\n"));
    }
}
