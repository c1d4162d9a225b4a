//! The questionnaire shipped with the survey.

use crate::{Question, QuestionBank};

/// The built-in Gujarati questionnaire.
///
/// For every question the first option leans Vata, the second Pitta and
/// the third Kapha.
pub fn builtin() -> QuestionBank {
    QuestionBank::new(vec![
        Question::new(
            "તમારા દાંત કેવા છે? (મજબૂતી અને રંગ)?",
            [
                "અનિયમિત, વાંકાચૂકા, સહેજ કાળાશ પડતા",
                "મધ્યમ, સહેજ પીળાશ પડતા",
                "મજબૂત, સફેદ",
            ],
        ),
        Question::new(
            "તમો કોઇ અણગમતી ઘટના થી ઉત્તેજીત/ઉશ્કેરાઈ જાઓ છો?",
            [
                "હા, નાની નાની બાબતોથી પણ ઉશ્કેરાઈ જાઉં છું",
                "હા, અમુક ચોક્કસ પરિસ્થિઓમાં ઉશ્કેરાઈ જાઉં છું",
                "મોટે ભાગે નહી, જૂજ પરિસ્થિતિઓમાં ઉશ્કેરાઈ જાઉં છું",
            ],
        ),
        Question::new(
            "તમારી ભૂખ કેવી છે",
            [
                "મને વારંવાર ભૂખ લાગે છે. ભૂખ સમય પણ અનિયમિત",
                "મને મોટે ભાગે નિયત સમયે જ ભૂખ લાગે, પરંતુ હું ભૂખ લાંબા સમય સુધી સહન ન કરી શકું",
                "મને મોટે ભાગે લાંબા સમયમાં ભૂખ લાગે, પરંતુ હું ભૂખ સહન કરી શકું",
            ],
        ),
        Question::new(
            "તમારી ત્વચા કેવી છે?",
            [
                "સૂકી, કરચલીઓ યુક્ત",
                "ખીલ અને તલ યુક્ત, લીસી",
                "ઘટ્ટ, તૈલી ત્વચા (soft & oily)",
            ],
        ),
        Question::new(
            "તમારા માથાનાં વાળ કેવા છે?",
            [
                "આછા, રૂક્ષ, તુટેલા, વધુ ખરે",
                "આછા, સુંવાળા, નાની ઉંમરે ટાલ પડે કે સફેદ થાય",
                "લાંબા, ઘટ્ટ, ચમકદાર, મજબૂત",
            ],
        ),
        Question::new(
            "તમને ક્યા પ્રકારનો ખોરાક(સ્વાદ) વધારે ગમે છે?",
            ["મીઠો અને ખાટો", "તીખો અને ખારો", "મીઠો અને તૂરો"],
        ),
        Question::new(
            "કોઈપણ નવી વસ્તુને સમજવામાં તમારી ગ્રહણશક્તિ કેવી છે?",
            [
                "વસ્તુઓને સમજવામાં મારે સમય લેવો પડે છે",
                "તરત જ સમજી અને ગ્રહણ કરી શકું છું",
                "સમજવામાં સમય લાગે પણ બહુ વધુ નહી",
            ],
        ),
        Question::new(
            "ક્યાં શારીરિક લક્ષણો તમને વારંવાર ઉત્પન્ન થાય છે?",
            [
                "સાંધાના દુખાવા, વા, અપચો",
                "ચામડીના રોગો, ચાંદા પડવા, ખીલ, વાળ ખરવા",
                "શરદી-ઉધરસ, એલર્જી, દમ, કાકડા માં સોજો",
            ],
        ),
        Question::new(
            "તમારું વ્યક્તિત્વ કેવું છે?",
            [
                "વ્યાકુળચિત્ત, પરિવર્તનશીલ, કોઈપણ કાર્યની શરૂઆત ખૂબ ઉત્સાહથી કરનાર",
                "નેતૃત્વ લેનાર, હિંમતભર્યું, સાહસી",
                "સ્નેહાળ, ક્ષમાવાન, દયાળુ, શાંત",
            ],
        ),
        Question::new(
            "તમે ગમે તે વસ્તુ ખાઓ તો પચાવી શકો છો?",
            [
                "ક્યારેક પચાવી શકું, ક્યારેક ન પચાવી શકું - પાચન શક્તિ અનિયમિત છે",
                "હા, કોઇપણ વસ્તુ પચી જાય છે",
                "પાચન થઈ જાય છે ,પરંતુ થોડી વાર લાગે છે",
            ],
        ),
    ])
}
